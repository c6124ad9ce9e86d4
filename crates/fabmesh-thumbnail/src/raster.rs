//! Software triangle rasterizer.
//!
//! Flat-shaded, two-sided, z-buffered. Triangles are expected in the posed
//! world frame produced by [`CameraRig`](crate::camera::CameraRig).

use fabmesh_math::{Point3, Vec3};
use fabmesh_mesh::Mesh;
use image::{Rgba, RgbaImage};

use crate::camera::CameraRig;
use crate::settings::ThumbnailSettings;
use crate::surface::RenderSurface;

/// A projected vertex: pixel coordinates plus NDC depth.
#[derive(Debug, Clone, Copy)]
struct ScreenVertex {
    x: f64,
    y: f64,
    z: f64,
}

fn edge(a: &ScreenVertex, b: &ScreenVertex, px: f64, py: f64) -> f64 {
    (b.x - a.x) * (py - a.y) - (b.y - a.y) * (px - a.x)
}

fn project(rig: &CameraRig, p: &Point3, width: f64, height: f64) -> Option<ScreenVertex> {
    let clip = rig.view_projection.apply_homogeneous(p);
    if clip.w <= f64::EPSILON {
        return None;
    }
    let ndc = clip.xyz() / clip.w;
    Some(ScreenVertex {
        x: (ndc.x + 1.0) * 0.5 * width,
        y: (1.0 - ndc.y) * 0.5 * height,
        z: ndc.z,
    })
}

/// Lambert shade for a face with normal `normal` (any length).
///
/// The normal is flipped to face `to_eye` first, so both sides of an open
/// surface light the same way.
pub fn shade(normal: &Vec3, to_eye: &Vec3, settings: &ThumbnailSettings) -> [u8; 4] {
    let Some(mut n) = normal.try_normalize(1e-12) else {
        return [0, 0, 0, 0];
    };
    if n.dot(to_eye) < 0.0 {
        n = -n;
    }

    let mut intensity = settings.ambient;
    for light in &settings.lights {
        let [x, y, z] = light.direction;
        if let Some(l) = Vec3::new(x, y, z).try_normalize(1e-12) {
            intensity += light.intensity * n.dot(&l).max(0.0);
        }
    }

    let [r, g, b] = settings.color.0;
    let lit = |c: u8| (c as f64 * intensity).round().clamp(0.0, 255.0) as u8;
    [lit(r), lit(g), lit(b), 255]
}

/// Draw every triangle of `mesh` into `surface`.
///
/// Returns the number of triangles that covered at least one pixel.
pub fn rasterize(
    mesh: &Mesh,
    rig: &CameraRig,
    settings: &ThumbnailSettings,
    surface: &mut RenderSurface<'_>,
) -> usize {
    let (width, height) = (surface.width(), surface.height());
    if width == 0 || height == 0 {
        return 0;
    }
    let (w, h) = (width as f64, height as f64);
    let mut drawn = 0;

    for [a, b, c] in mesh.triangles() {
        let normal = (b - a).cross(&(c - a));
        if normal.norm_squared() == 0.0 {
            continue;
        }
        let centroid = Point3::from((a.coords + b.coords + c.coords) / 3.0);
        let rgba = shade(&normal, &(rig.eye - centroid), settings);

        let (Some(s0), Some(s1), Some(s2)) = (
            project(rig, &a, w, h),
            project(rig, &b, w, h),
            project(rig, &c, w, h),
        ) else {
            continue;
        };

        let area = edge(&s0, &s1, s2.x, s2.y);
        if area.abs() < 1e-12 || !area.is_finite() {
            continue;
        }

        let min_x = s0.x.min(s1.x).min(s2.x).floor().max(0.0);
        let max_x = s0.x.max(s1.x).max(s2.x).ceil().min(w - 1.0);
        let min_y = s0.y.min(s1.y).min(s2.y).floor().max(0.0);
        let max_y = s0.y.max(s1.y).max(s2.y).ceil().min(h - 1.0);
        if min_x > max_x || min_y > max_y {
            continue;
        }

        let mut covered = false;
        for py in min_y as u32..=max_y as u32 {
            let cy = py as f64 + 0.5;
            for px in min_x as u32..=max_x as u32 {
                let cx = px as f64 + 0.5;
                // Dividing by the signed area accepts either winding.
                let b0 = edge(&s1, &s2, cx, cy) / area;
                let b1 = edge(&s2, &s0, cx, cy) / area;
                let b2 = edge(&s0, &s1, cx, cy) / area;
                if b0 < 0.0 || b1 < 0.0 || b2 < 0.0 {
                    continue;
                }
                let z = b0 * s0.z + b1 * s1.z + b2 * s2.z;
                if !(-1.0..=1.0).contains(&z) {
                    continue;
                }
                covered |= surface.plot(px, py, z as f32, rgba);
            }
        }
        if covered {
            drawn += 1;
        }
    }

    drawn
}

/// Box-filter `image` down by `factor` along each axis.
///
/// Color is averaged with alpha weighting so transparent background samples
/// do not darken silhouette edges.
pub fn downsample(image: &RgbaImage, factor: u32) -> RgbaImage {
    if factor <= 1 {
        return image.clone();
    }
    let (out_w, out_h) = (image.width() / factor, image.height() / factor);
    let samples = (factor * factor) as f64;

    RgbaImage::from_fn(out_w, out_h, |ox, oy| {
        let mut premul = [0.0f64; 3];
        let mut alpha = 0.0f64;
        for sy in 0..factor {
            for sx in 0..factor {
                let p = image.get_pixel(ox * factor + sx, oy * factor + sy).0;
                let a = p[3] as f64;
                for (acc, &c) in premul.iter_mut().zip(&p[..3]) {
                    *acc += c as f64 * a;
                }
                alpha += a;
            }
        }
        if alpha == 0.0 {
            return Rgba([0, 0, 0, 0]);
        }
        let channel = |acc: f64| (acc / alpha).round().clamp(0.0, 255.0) as u8;
        Rgba([
            channel(premul[0]),
            channel(premul[1]),
            channel(premul[2]),
            (alpha / samples).round().clamp(0.0, 255.0) as u8,
        ])
    })
}
