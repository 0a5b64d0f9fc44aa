use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Time must be finite and strictly positive.
    #[error("invalid time {0}: t must be finite and > 0")]
    InvalidTime(f64),

    #[error("invalid grid: {axis} resolution is {resolution}, need at least 2")]
    InvalidGrid {
        axis: &'static str,
        resolution: usize,
    },

    #[error("invalid {axis} range [{start}, {end}]")]
    InvalidRange {
        axis: &'static str,
        start: f64,
        end: f64,
    },

    #[error("invalid constant {name} = {value}")]
    InvalidConstant { name: &'static str, value: f64 },

    #[error("invalid timeline: {0}")]
    InvalidTimeline(&'static str),

    #[error("invalid frame rate {0}")]
    InvalidFrameRate(u32),
}

pub(crate) fn check_time(t: f64) -> Result<f64> {
    if t.is_finite() && t > 0.0 {
        Ok(t)
    } else {
        Err(Error::InvalidTime(t))
    }
}
