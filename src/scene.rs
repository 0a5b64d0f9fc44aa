//! The pulse scene: how time and the camera move while the surface is shown.
//!
//! The scene has two phases. First `t` runs linearly from `t_start` to `t_end`
//! with the camera fixed. Then `t` is held and the camera orbits around the
//! vertical axis at `rotation_rate` radians per second.
//!
//! [`Scene::run`] drives an [`Evaluator`] through every frame: it sets the
//! frame's time, samples the surface and hands the field to a callback.

use log::info;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::evaluator::{Evaluator, HeightField};
use crate::grid::SamplingGrid;
use crate::surface::{Constants, Surface};

/// Orbit camera orientation. Angles are in radians.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Camera {
    /// Polar angle from the +z axis.
    pub phi: f64,
    /// Azimuth around the z axis.
    pub theta: f64,
    pub zoom: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            phi: 70f64.to_radians(),
            theta: (-30f64).to_radians(),
            zoom: 0.8,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timeline {
    pub t_start: f64,
    pub t_end: f64,
    /// Seconds spent moving `t` from `t_start` to `t_end`.
    pub diffusion_run_time: f64,
    /// Camera azimuth rate during the second phase, radians per second.
    pub rotation_rate: f64,
    /// Seconds spent rotating.
    pub rotation_time: f64,
}

impl Default for Timeline {
    fn default() -> Self {
        Self {
            t_start: 0.2,
            t_end: 4.0,
            diffusion_run_time: 6.0,
            rotation_rate: 0.2,
            rotation_time: 2.0,
        }
    }
}

impl Timeline {
    pub fn validate(&self) -> Result<()> {
        if !(self.t_start.is_finite() && self.t_start > 0.0) {
            return Err(Error::InvalidTime(self.t_start));
        }
        if !(self.t_end.is_finite() && self.t_end >= self.t_start) {
            return Err(Error::InvalidTimeline("t_end must be >= t_start"));
        }
        if !(self.diffusion_run_time.is_finite() && self.diffusion_run_time >= 0.0) {
            return Err(Error::InvalidTimeline("diffusion_run_time must be >= 0"));
        }
        if !(self.rotation_time.is_finite() && self.rotation_time >= 0.0) {
            return Err(Error::InvalidTimeline("rotation_time must be >= 0"));
        }
        if !self.rotation_rate.is_finite() {
            return Err(Error::InvalidTimeline("rotation_rate must be finite"));
        }
        Ok(())
    }

    /// Total length of the scene in seconds.
    pub fn duration(&self) -> f64 {
        self.diffusion_run_time + self.rotation_time
    }

    /// `t` at `seconds` into the scene.
    pub fn time_at(&self, seconds: f64) -> f64 {
        if self.diffusion_run_time <= 0.0 || seconds >= self.diffusion_run_time {
            return self.t_end;
        }
        let alpha = (seconds / self.diffusion_run_time).max(0.0);
        self.t_start + (self.t_end - self.t_start) * alpha
    }

    /// Camera at `seconds` into the scene, starting from `initial`.
    pub fn camera_at(&self, initial: &Camera, seconds: f64) -> Camera {
        let rotating = (seconds - self.diffusion_run_time).max(0.0);
        Camera {
            theta: initial.theta + self.rotation_rate * rotating,
            ..*initial
        }
    }

    /// Frames at `fps`, from the first frame of the diffusion to the last
    /// frame of the rotation.
    pub fn frames(&self, camera: Camera, fps: u32) -> Result<Frames> {
        self.validate()?;
        if fps == 0 {
            return Err(Error::InvalidFrameRate(fps));
        }
        let fps_f = f64::from(fps);
        let steps = (self.duration() * fps_f).round();
        if !(steps < usize::MAX as f64) {
            return Err(Error::InvalidTimeline("too many frames"));
        }
        let count = (steps as usize)
            .checked_add(1)
            .ok_or(Error::InvalidTimeline("too many frames"))?;

        Ok(Frames {
            timeline: *self,
            camera,
            fps: fps_f,
            index: 0,
            count,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub index: usize,
    /// Seconds since the start of the scene.
    pub seconds: f64,
    pub t: f64,
    pub camera: Camera,
}

#[derive(Debug, Clone)]
pub struct Frames {
    timeline: Timeline,
    camera: Camera,
    fps: f64,
    index: usize,
    count: usize,
}

impl Iterator for Frames {
    type Item = Frame;

    fn next(&mut self) -> Option<Frame> {
        if self.index >= self.count {
            return None;
        }

        let index = self.index;
        self.index += 1;

        let seconds = (index as f64 / self.fps).min(self.timeline.duration());
        Some(Frame {
            index,
            seconds,
            t: self.timeline.time_at(seconds),
            camera: self.timeline.camera_at(&self.camera, seconds),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.count - self.index;
        (n, Some(n))
    }
}

impl ExactSizeIterator for Frames {}

/// Everything needed to set up the scene.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub constants: Constants,
    pub grid: SamplingGrid,
    pub timeline: Timeline,
    pub camera: Camera,
}

pub struct Scene {
    evaluator: Evaluator,
    timeline: Timeline,
    camera: Camera,
}

impl Scene {
    pub fn new(config: SceneConfig) -> Result<Self> {
        config.timeline.validate()?;
        let surface = Surface::new(config.constants)?;
        let evaluator = Evaluator::new(surface, config.grid, config.timeline.t_start)?;

        Ok(Self {
            evaluator,
            timeline: config.timeline,
            camera: config.camera,
        })
    }

    pub fn evaluator(&self) -> &Evaluator {
        &self.evaluator
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Run every frame at `fps` through `render`. Returns the number of
    /// frames rendered.
    pub fn run<F, E>(&mut self, fps: u32, mut render: F) -> std::result::Result<usize, E>
    where
        F: FnMut(&Frame, &HeightField) -> std::result::Result<(), E>,
        E: From<Error>,
    {
        let frames = self.timeline.frames(self.camera, fps)?;
        info!(
            "running {} frames at {} fps ({} s)",
            frames.len(),
            fps,
            self.timeline.duration()
        );

        let mut n = 0;
        for frame in frames {
            self.evaluator.set_time(frame.t)?;
            let field = self.evaluator.evaluate();
            render(&frame, &field)?;
            n += 1;
        }

        Ok(n)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_time_at() {
        let tl = Timeline::default();

        assert_abs_diff_eq!(tl.time_at(0.0), 0.2);
        assert_abs_diff_eq!(tl.time_at(3.0), 2.1, epsilon = 1e-12);
        assert_abs_diff_eq!(tl.time_at(6.0), 4.0);
        assert_abs_diff_eq!(tl.time_at(7.5), 4.0);
    }

    #[test]
    fn test_camera_at() {
        let tl = Timeline::default();
        let cam = Camera::default();

        assert_eq!(tl.camera_at(&cam, 5.0), cam);
        let end = tl.camera_at(&cam, 8.0);
        assert_abs_diff_eq!(end.theta, cam.theta + 0.4, epsilon = 1e-12);
        assert_abs_diff_eq!(end.phi, cam.phi);
        assert_abs_diff_eq!(end.zoom, 0.8);
    }

    #[test]
    fn test_frames() {
        let tl = Timeline::default();
        let frames: Vec<_> = tl.frames(Camera::default(), 15).unwrap().collect();

        assert_eq!(frames.len(), 8 * 15 + 1);
        assert_abs_diff_eq!(frames[0].t, 0.2);
        assert_abs_diff_eq!(frames[90].t, 4.0);
        assert_abs_diff_eq!(frames.last().unwrap().seconds, 8.0);

        for w in frames.windows(2) {
            assert!(w[1].t >= w[0].t);
            assert!(w[1].t > 0.0);
        }
        for f in &frames[90..] {
            assert_abs_diff_eq!(f.t, 4.0);
        }
    }

    #[test]
    fn test_frames_rejects_zero_fps() {
        let tl = Timeline::default();
        assert_eq!(
            tl.frames(Camera::default(), 0).err(),
            Some(Error::InvalidFrameRate(0))
        );
    }

    #[test]
    fn test_frames_rejects_invalid_timeline() {
        let tl = Timeline {
            t_start: -1.0,
            ..Timeline::default()
        };
        assert_eq!(
            tl.frames(Camera::default(), 5).err(),
            Some(Error::InvalidTime(-1.0))
        );

        let tl = Timeline {
            rotation_time: f64::INFINITY,
            ..Timeline::default()
        };
        assert!(tl.frames(Camera::default(), 5).is_err());

        let tl = Timeline {
            rotation_time: 1e300,
            ..Timeline::default()
        };
        assert_eq!(
            tl.frames(Camera::default(), 5).err(),
            Some(Error::InvalidTimeline("too many frames"))
        );
    }

    #[test]
    fn test_validate() {
        assert!(Timeline::default().validate().is_ok());

        let tl = Timeline {
            t_start: 0.0,
            ..Timeline::default()
        };
        assert_eq!(tl.validate(), Err(Error::InvalidTime(0.0)));

        let tl = Timeline {
            t_end: 0.1,
            ..Timeline::default()
        };
        assert!(tl.validate().is_err());

        let tl = Timeline {
            rotation_time: -1.0,
            ..Timeline::default()
        };
        assert!(tl.validate().is_err());
    }

    #[test]
    fn test_run() {
        let mut scene = Scene::new(SceneConfig::default()).unwrap();
        let mut seen = Vec::new();

        let n = scene
            .run(5, |frame, field| -> Result<()> {
                assert_eq!(field.dim(), (48, 48));
                assert_abs_diff_eq!(field.time(), frame.t);
                seen.push(frame.t);
                Ok(())
            })
            .unwrap();

        assert_eq!(n, 41);
        assert_eq!(seen.len(), 41);
        assert_abs_diff_eq!(scene.evaluator().time(), 4.0);
    }

    #[test]
    fn test_run_stops_on_error() {
        let mut scene = Scene::new(SceneConfig::default()).unwrap();
        let mut calls = 0;

        let r = scene.run(5, |frame, _| {
            calls += 1;
            if frame.index == 3 {
                Err(Error::InvalidTimeline("stop"))
            } else {
                Ok(())
            }
        });

        assert_eq!(r, Err(Error::InvalidTimeline("stop")));
        assert_eq!(calls, 4);
    }

    #[test]
    fn test_config_from_toml() {
        let config: SceneConfig = toml::from_str(
            r#"
            [constants]
            frequency = 5.0

            [grid]
            resolution = [32, 16]

            [timeline]
            t_end = 3.0
            "#,
        )
        .unwrap();

        assert_abs_diff_eq!(config.constants.frequency, 5.0);
        assert_abs_diff_eq!(config.constants.spread_rate, 2.0);
        assert_eq!(config.grid.resolution, (32, 16));
        assert_abs_diff_eq!(config.grid.u_range.start, -5.0);
        assert_abs_diff_eq!(config.timeline.t_end, 3.0);
        assert_abs_diff_eq!(config.timeline.t_start, 0.2);
        assert_eq!(config.camera, Camera::default());
    }

    #[test]
    fn test_scene_rejects_bad_config() {
        let mut config = SceneConfig::default();
        config.constants.spread_rate = 0.0;
        assert!(Scene::new(config).is_err());

        let mut config = SceneConfig::default();
        config.grid.resolution = (48, 1);
        assert!(Scene::new(config).is_err());
    }
}
