use std::path::{Path, PathBuf};

use cgmath::{point3, vec3, Matrix4, Point3, Transform};
use image::{Rgb, RgbImage};
use ndarray::Array2;
use pulse::{Camera, HeightField};
use tiny_skia::{Color, Paint, PathBuilder, Pixmap, Stroke};

/// Scene units visible across the frame at zoom 1.
const FRAME_WIDTH: f64 = 14.0;

fn frame_path(dir: &Path, prefix: &str, index: usize) -> PathBuf {
    dir.join(format!("{}_{:06}.png", prefix, index))
}

/// Grayscale image of the heights, mapping `[-z_scale, z_scale]` to black..white.
pub fn save_heightmap(
    dir: &Path,
    prefix: &str,
    index: usize,
    field: &HeightField,
    z_scale: f64,
) -> anyhow::Result<()> {
    let z = field.heights();
    let (w, h) = z.dim();

    let mut img = RgbImage::new(w as u32, h as u32);

    for i in 0..w {
        for j in 0..h {
            let l = ((z[[i, j]] / z_scale * 0.5 + 0.5) * 256.0).max(0.0).min(255.0) as u8;
            // v grows upward
            img.put_pixel(i as u32, (h - 1 - j) as u32, Rgb([l, l, l]));
        }
    }

    img.save(frame_path(dir, prefix, index))?;

    Ok(())
}

fn view_matrix(camera: &Camera) -> Matrix4<f64> {
    let (sp, cp) = camera.phi.sin_cos();
    let (st, ct) = camera.theta.sin_cos();
    let eye = point3(sp * ct, sp * st, cp) * 20.0;

    Matrix4::look_at_rh(eye, point3(0.0, 0.0, 0.0), vec3(0.0, 0.0, 1.0))
}

/// Orthographic projection of every sample to pixel coordinates.
pub fn project(field: &HeightField, camera: &Camera, size: u32) -> Array2<(f32, f32)> {
    let view = view_matrix(camera);
    let half = size as f64 / 2.0;
    let scale = camera.zoom * size as f64 / FRAME_WIDTH;

    field.points().map(|p: &Point3<f64>| {
        let q = view.transform_point(*p);
        ((half + q.x * scale) as f32, (half - q.y * scale) as f32)
    })
}

/// White wireframe of the u and v grid lines on black.
pub fn save_wireframe(
    dir: &Path,
    prefix: &str,
    index: usize,
    field: &HeightField,
    camera: &Camera,
    size: u32,
) -> anyhow::Result<()> {
    let mut pixmap =
        Pixmap::new(size, size).ok_or_else(|| anyhow::anyhow!("invalid image size {}", size))?;
    pixmap.fill(Color::BLACK);

    let xy = project(field, camera, size);
    let (w, h) = xy.dim();

    let mut pb = PathBuilder::new();
    for i in 0..w {
        pb.move_to(xy[[i, 0]].0, xy[[i, 0]].1);
        for j in 1..h {
            pb.line_to(xy[[i, j]].0, xy[[i, j]].1);
        }
    }
    for j in 0..h {
        pb.move_to(xy[[0, j]].0, xy[[0, j]].1);
        for i in 1..w {
            pb.line_to(xy[[i, j]].0, xy[[i, j]].1);
        }
    }
    let path = pb
        .finish()
        .ok_or_else(|| anyhow::anyhow!("empty wireframe"))?;

    let mut paint = Paint::default();
    paint.set_color_rgba8(255, 255, 255, 255);
    paint.anti_alias = true;

    let stroke = Stroke {
        width: 1.5,
        ..Stroke::default()
    };

    pixmap.stroke_path(&path, &paint, &stroke, tiny_skia::Transform::identity(), None);
    pixmap.save_png(frame_path(dir, prefix, index))?;

    Ok(())
}
