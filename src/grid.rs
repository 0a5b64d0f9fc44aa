use ndarray::Array1;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Closed interval `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Range {
    pub start: f64,
    pub end: f64,
}

impl Range {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    pub fn width(&self) -> f64 {
        self.end - self.start
    }

    /// `n` evenly spaced points from `start` to `end`, both included.
    pub fn sample(&self, n: usize) -> Array1<f64> {
        Array1::linspace(self.start, self.end, n)
    }

    fn validate(&self, axis: &'static str) -> Result<()> {
        if self.start.is_finite() && self.end.is_finite() && self.start < self.end {
            Ok(())
        } else {
            Err(Error::InvalidRange {
                axis,
                start: self.start,
                end: self.end,
            })
        }
    }

    /// Index of the sample nearest `x` among `n` samples, clamped to the range.
    fn nearest(&self, x: f64, n: usize) -> usize {
        if n < 2 {
            return 0;
        }
        let step = self.width() / (n - 1) as f64;
        let k = ((x - self.start) / step).round();
        k.max(0.0).min((n - 1) as f64) as usize
    }
}

/// Rectangular `(u, v)` sampling domain.
///
/// Sample `[[i, j]]` lies at `(u_values()[i], v_values()[j])`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplingGrid {
    pub u_range: Range,
    pub v_range: Range,
    pub resolution: (usize, usize),
}

impl Default for SamplingGrid {
    fn default() -> Self {
        Self {
            u_range: Range::new(-5.0, 5.0),
            v_range: Range::new(-5.0, 5.0),
            resolution: (48, 48),
        }
    }
}

impl SamplingGrid {
    pub fn new(u_range: Range, v_range: Range, resolution: (usize, usize)) -> Result<Self> {
        let grid = Self {
            u_range,
            v_range,
            resolution,
        };
        grid.validate()?;
        Ok(grid)
    }

    pub fn validate(&self) -> Result<()> {
        self.u_range.validate("u")?;
        self.v_range.validate("v")?;

        let (nu, nv) = self.resolution;
        if nu < 2 {
            return Err(Error::InvalidGrid {
                axis: "u",
                resolution: nu,
            });
        }
        if nv < 2 {
            return Err(Error::InvalidGrid {
                axis: "v",
                resolution: nv,
            });
        }

        Ok(())
    }

    pub fn dim(&self) -> (usize, usize) {
        self.resolution
    }

    pub fn len(&self) -> usize {
        self.resolution.0 * self.resolution.1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn u_values(&self) -> Array1<f64> {
        self.u_range.sample(self.resolution.0)
    }

    pub fn v_values(&self) -> Array1<f64> {
        self.v_range.sample(self.resolution.1)
    }

    /// Grid index of the sample nearest `(u, v)`.
    pub fn nearest_index(&self, u: f64, v: f64) -> (usize, usize) {
        (
            self.u_range.nearest(u, self.resolution.0),
            self.v_range.nearest(v, self.resolution.1),
        )
    }
}
