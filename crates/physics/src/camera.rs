//! Software camera: casts one ray per pixel against the collider set.
//!
//! Shading is a single directional light with a flat ambient term. The ground
//! gets a checkerboard so motion is visible in recordings, and rays that hit
//! nothing get a vertical sky gradient.

#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss
)]

use rapier3d::parry::query::Ray;
use rapier3d::prelude::{ColliderSet, Isometry, Point, Real, RigidBodySet, Vector};

use crate::transform;
use crate::types::{CameraConfig, CameraImage};

const CHECKER_FLAG: u128 = 1 << 32;
const CHECKER_SIZE: f32 = 0.5;
const AMBIENT: f32 = 0.35;
const SKY_TOP: [f32; 3] = [0.45, 0.62, 0.85];
const SKY_HORIZON: [f32; 3] = [0.85, 0.9, 0.95];

/// Packs a display color (and the checkerboard flag) into collider user data.
#[must_use]
pub fn pack_color(color: [f32; 4], checkered: bool) -> u128 {
    let mut packed = 0_u128;
    for (i, c) in color.iter().enumerate() {
        packed |= u128::from(to_byte(*c)) << (8 * i);
    }
    if checkered {
        packed |= CHECKER_FLAG;
    }
    packed
}

/// Inverse of [`pack_color`]: the RGB color and the checkerboard flag.
#[must_use]
pub fn unpack_color(packed: u128) -> ([f32; 3], bool) {
    let channel = |i: u32| f32::from(((packed >> (8 * i)) & 0xff) as u8) / 255.0;
    ([channel(0), channel(1), channel(2)], packed & CHECKER_FLAG != 0)
}

fn to_byte(c: f32) -> u8 {
    (c.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Renders the scene seen by `camera`.
///
/// Collider poses are derived from their parent bodies so teleported bodies
/// show up before the next simulation step.
#[must_use]
pub fn render(bodies: &RigidBodySet, colliders: &ColliderSet, camera: &CameraConfig) -> CameraImage {
    let eye = Point::from(transform::vector(camera.eye));
    let forward = (transform::vector(camera.target) - eye.coords)
        .try_normalize(f32::EPSILON)
        .unwrap_or_else(Vector::x);
    let right = forward
        .cross(&transform::vector(camera.up))
        .try_normalize(f32::EPSILON)
        .unwrap_or_else(Vector::y);
    let up = right.cross(&forward);
    let light = Vector::new(0.4, -0.3, 1.0).normalize();

    let scene: Vec<(Isometry<Real>, &dyn rapier3d::parry::shape::Shape, u128)> = colliders
        .iter()
        .filter_map(|(_, collider)| {
            let pose = match (collider.parent(), collider.position_wrt_parent()) {
                (Some(parent), Some(local)) => bodies.get(parent)?.position() * local,
                _ => *collider.position(),
            };
            Some((pose, collider.shape(), collider.user_data))
        })
        .collect();

    let (width, height) = (camera.width.max(1), camera.height.max(1));
    let aspect = width as f32 / height as f32;
    let half_h = (camera.fov_y.to_radians() * 0.5).tan();
    let mut rgba = Vec::with_capacity(width as usize * height as usize * 4);

    for py in 0..height {
        let v = (1.0 - 2.0 * (py as f32 + 0.5) / height as f32) * half_h;
        for px in 0..width {
            let u = (2.0 * (px as f32 + 0.5) / width as f32 - 1.0) * half_h * aspect;
            let dir = (forward + right * u + up * v).normalize();
            let ray = Ray::new(eye, dir);

            let hit = scene
                .iter()
                .filter_map(|(pose, shape, data)| {
                    shape
                        .cast_ray_and_get_normal(pose, &ray, camera.far, true)
                        .map(|hit| (hit, *data))
                })
                .min_by(|(a, _), (b, _)| a.time_of_impact.total_cmp(&b.time_of_impact));

            let color = match hit {
                Some((hit, data)) => {
                    let (mut base, checkered) = unpack_color(data);
                    if checkered {
                        let p = ray.point_at(hit.time_of_impact);
                        let cell = (p.x / CHECKER_SIZE).floor() + (p.y / CHECKER_SIZE).floor();
                        if cell.rem_euclid(2.0) >= 1.0 {
                            base = base.map(|c| c * 0.8);
                        }
                    }
                    let diffuse = hit.normal.dot(&light).max(0.0);
                    let shade = AMBIENT + (1.0 - AMBIENT) * diffuse;
                    base.map(|c| c * shade)
                }
                None => {
                    let t = dir.z.clamp(0.0, 1.0);
                    [0, 1, 2].map(|i| SKY_HORIZON[i] + (SKY_TOP[i] - SKY_HORIZON[i]) * t)
                }
            };
            rgba.extend(color.map(to_byte));
            rgba.push(u8::MAX);
        }
    }

    CameraImage {
        width,
        height,
        rgba,
    }
}
