use cgmath::{point3, Point3};
use serde::{Deserialize, Serialize};

use crate::error::{check_time, Error, Result};

/// Peak height scale of the pulse at `t = 1`.
pub const AMPLITUDE: f64 = 1.5;

/// Tuning constants of the pulse. They shape the picture only.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Constants {
    /// Spacing of the ripple rings.
    pub frequency: f64,
    /// How fast the ripples travel outward.
    pub wave_speed: f64,
    /// Amplitude falls off as `t^-decay_rate`.
    pub decay_rate: f64,
    /// Width of the Gaussian envelope grows as `sqrt(spread_rate * t)`.
    pub spread_rate: f64,
}

impl Default for Constants {
    fn default() -> Self {
        Self {
            frequency: 4.0,
            wave_speed: 3.0,
            decay_rate: 1.0,
            spread_rate: 2.0,
        }
    }
}

impl Constants {
    pub fn new(frequency: f64, wave_speed: f64, decay_rate: f64, spread_rate: f64) -> Result<Self> {
        let c = Self {
            frequency,
            wave_speed,
            decay_rate,
            spread_rate,
        };
        c.validate()?;
        Ok(c)
    }

    /// All constants must be finite; `decay_rate` and `spread_rate` must be non-zero.
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("frequency", self.frequency, false),
            ("wave_speed", self.wave_speed, false),
            ("decay_rate", self.decay_rate, true),
            ("spread_rate", self.spread_rate, true),
        ];

        for &(name, value, non_zero) in fields.iter() {
            if !value.is_finite() || (non_zero && value == 0.0) {
                return Err(Error::InvalidConstant { name, value });
            }
        }

        Ok(())
    }
}

/// The closed-form pulse surface.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Surface {
    constants: Constants,
}

impl Surface {
    pub fn new(constants: Constants) -> Result<Self> {
        constants.validate()?;
        Ok(Self { constants })
    }

    pub fn constants(&self) -> &Constants {
        &self.constants
    }

    /// Magnitude bound of `z` at squared radius `r2`.
    pub fn envelope(&self, r2: f64, t: f64) -> f64 {
        let c = &self.constants;
        AMPLITUDE / t.powf(c.decay_rate) * (-r2 / (c.spread_rate * t)).exp()
    }

    /// Height of the surface at `(u, v)`.
    ///
    /// `t` must be strictly positive; use [`Surface::try_eval`] when it is not
    /// known to be.
    pub fn height(&self, u: f64, v: f64, t: f64) -> f64 {
        let c = &self.constants;
        let r2 = u * u + v * v;
        let wave = (c.frequency * r2.sqrt() - c.wave_speed * t).cos();

        self.envelope(r2, t) * wave
    }

    pub fn eval(&self, u: f64, v: f64, t: f64) -> Point3<f64> {
        point3(u, v, self.height(u, v, t))
    }

    /// Accept `t` only if it is positive and the amplitude at `t` is finite.
    pub fn check_time(&self, t: f64) -> Result<f64> {
        let t = check_time(t)?;
        if self.envelope(0.0, t).is_finite() {
            Ok(t)
        } else {
            Err(Error::InvalidTime(t))
        }
    }

    pub fn try_eval(&self, u: f64, v: f64, t: f64) -> Result<Point3<f64>> {
        let t = self.check_time(t)?;
        Ok(self.eval(u, v, t))
    }
}
