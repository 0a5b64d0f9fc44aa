//! A diffusing wave pulse sampled as a height field.
//!
//! The surface is
//! `z = 1.5 / t^decay * cos(freq * r - speed * t) * exp(-r^2 / (spread * t))`
//! with `r = sqrt(u^2 + v^2)`. An [`Evaluator`] owns the current time and
//! resamples the surface over a [`SamplingGrid`] on every call to
//! [`Evaluator::evaluate`].

pub mod error;
pub mod evaluator;
pub mod grid;
pub mod scene;
pub mod surface;

pub use error::{Error, Result};
pub use evaluator::{Evaluator, HeightField};
pub use grid::{Range, SamplingGrid};
pub use scene::{Camera, Frame, Scene, SceneConfig, Timeline};
pub use surface::{Constants, Surface, AMPLITUDE};
