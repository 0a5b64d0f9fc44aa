use cgmath::Point3;
use log::{debug, trace};
use ndarray::{Array, Array1, Array2};

use crate::error::Result;
use crate::grid::SamplingGrid;
use crate::surface::Surface;

/// One sampling of the surface: a point per grid sample, indexed like the grid.
#[derive(Debug, Clone, PartialEq)]
pub struct HeightField {
    points: Array2<Point3<f64>>,
    t: f64,
}

impl HeightField {
    /// Time this field was sampled at.
    pub fn time(&self) -> f64 {
        self.t
    }

    pub fn dim(&self) -> (usize, usize) {
        self.points.dim()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &Array2<Point3<f64>> {
        &self.points
    }

    pub fn get(&self, i: usize, j: usize) -> Option<&Point3<f64>> {
        self.points.get([i, j])
    }

    pub fn heights(&self) -> Array2<f64> {
        self.points.map(|p| p.z)
    }

    /// `(min, max)` of the heights.
    pub fn z_range(&self) -> (f64, f64) {
        self.points
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
                (lo.min(p.z), hi.max(p.z))
            })
    }

    /// Sample whose `(u, v)` is nearest the given point.
    pub fn nearest(&self, u: f64, v: f64) -> &Point3<f64> {
        let mut best = &self.points[[0, 0]];
        let mut best_d = f64::INFINITY;

        for p in self.points.iter() {
            let d = (p.x - u).powi(2) + (p.y - v).powi(2);
            if d < best_d {
                best = p;
                best_d = d;
            }
        }

        best
    }
}

/// Holds the current time and resamples the surface on demand.
#[derive(Debug, Clone)]
pub struct Evaluator {
    surface: Surface,
    grid: SamplingGrid,
    us: Array1<f64>,
    vs: Array1<f64>,
    t: f64,
}

impl Evaluator {
    pub fn new(surface: Surface, grid: SamplingGrid, t: f64) -> Result<Self> {
        grid.validate()?;
        let t = surface.check_time(t)?;

        Ok(Self {
            surface,
            grid,
            us: grid.u_values(),
            vs: grid.v_values(),
            t,
        })
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn grid(&self) -> &SamplingGrid {
        &self.grid
    }

    pub fn time(&self) -> f64 {
        self.t
    }

    /// Replace the current time. On error the previous time is kept.
    pub fn set_time(&mut self, t: f64) -> Result<()> {
        self.t = self.surface.check_time(t)?;
        debug!("time set to {}", self.t);
        Ok(())
    }

    /// Sample the surface at the current time over the whole grid.
    pub fn evaluate(&self) -> HeightField {
        let t = self.t;
        trace!("evaluating {:?} samples at t = {}", self.grid.dim(), t);

        let points = Array::from_shape_fn(self.grid.dim(), |(i, j)| {
            self.surface.eval(self.us[i], self.vs[j], t)
        });

        HeightField { points, t }
    }
}
