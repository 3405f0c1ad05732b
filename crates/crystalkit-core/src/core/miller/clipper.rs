use crate::core::models::plane::ClippedPolygon;
use crate::core::utils::geometry;
use crate::engine::config::KernelConfig;
use nalgebra::{Point3, Vector3};
use tracing::{debug, instrument, trace};

pub fn clip_plane_to_box(normal: &Vector3<f64>, offset: f64, half_extent: f64) -> ClippedPolygon {
    clip_plane_to_box_with(normal, offset, half_extent, &KernelConfig::default())
}

/// Section of the plane `normal · x = offset` with the cube `[-half_extent, half_extent]³`.
///
/// A quad far larger than the box is laid in the plane and clipped against the
/// six faces in turn (Sutherland–Hodgman). An empty polygon means the plane
/// misses the box, or that `normal` is zero. Vertices wind counter-clockwise
/// when viewed from the side `normal` points to.
#[instrument(skip_all, name = "plane_clipping", fields(offset = offset, half_extent = half_extent))]
pub fn clip_plane_to_box_with(
    normal: &Vector3<f64>,
    offset: f64,
    half_extent: f64,
    config: &KernelConfig,
) -> ClippedPolygon {
    let normal = geometry::normalize(normal);
    if normal == Vector3::zeros()
        || !geometry::is_finite(&normal)
        || !offset.is_finite()
        || !(half_extent.is_finite() && half_extent > 0.0)
    {
        return ClippedPolygon::empty();
    }

    let (u, v) = plane_tangents(&normal, config.tangent_alignment_limit);
    let center = Point3::from(geometry::scale(&normal, offset));
    let s = config.plane_cover_factor * half_extent;

    let mut polygon = vec![
        center + (u + v) * s,
        center + (v - u) * s,
        center - (u + v) * s,
        center + (u - v) * s,
    ];

    for axis in 0..3 {
        for sign in [1.0, -1.0] {
            polygon = clip_against_face(&polygon, axis, sign, half_extent, config.clip_epsilon);
            trace!(axis, sign, vertices = polygon.len(), "Clipped against box face.");
            if polygon.len() < 3 {
                debug!("Plane does not intersect the bounding box.");
                return ClippedPolygon::empty();
            }
        }
    }

    let vertices = drop_repeated_vertices(polygon, config.clip_epsilon);
    if vertices.len() < 3 {
        return ClippedPolygon::empty();
    }
    debug!(vertices = vertices.len(), "Plane clipped to bounding box.");
    ClippedPolygon { vertices }
}

/// Orthonormal `(u, v)` spanning the plane, with `u × v = normal`.
fn plane_tangents(normal: &Vector3<f64>, alignment_limit: f64) -> (Vector3<f64>, Vector3<f64>) {
    let seed = if geometry::dot(normal, &Vector3::x()).abs() < alignment_limit {
        Vector3::x()
    } else {
        Vector3::y()
    };
    let u = geometry::normalize(&geometry::cross(normal, &seed));
    let v = geometry::cross(normal, &u);
    (u, v)
}

/// One Sutherland–Hodgman pass against the half-space `sign · p[axis] ≤ bound`.
fn clip_against_face(
    polygon: &[Point3<f64>],
    axis: usize,
    sign: f64,
    bound: f64,
    epsilon: f64,
) -> Vec<Point3<f64>> {
    let distance = |p: &Point3<f64>| sign * p[axis] - bound;
    let mut clipped = Vec::with_capacity(polygon.len() + 1);

    for (i, current) in polygon.iter().enumerate() {
        let next = &polygon[(i + 1) % polygon.len()];
        let (dc, dn) = (distance(current), distance(next));
        let current_inside = dc <= epsilon;
        let next_inside = dn <= epsilon;

        if current_inside {
            clipped.push(*current);
        }
        if current_inside != next_inside {
            clipped.push(intersect(current, next, dc, dn));
        }
    }
    clipped
}

fn intersect(a: &Point3<f64>, b: &Point3<f64>, da: f64, db: f64) -> Point3<f64> {
    let denom = da - db;
    if denom.abs() < 1e-12 {
        return *a;
    }
    let t = (da / denom).clamp(0.0, 1.0);
    a + (b - a) * t
}

fn drop_repeated_vertices(polygon: Vec<Point3<f64>>, epsilon: f64) -> Vec<Point3<f64>> {
    let mut kept: Vec<Point3<f64>> = Vec::with_capacity(polygon.len());
    for p in polygon {
        if kept.last().is_none_or(|last| nalgebra::distance(last, &p) > epsilon) {
            kept.push(p);
        }
    }
    while kept.len() > 1 && nalgebra::distance(&kept[0], &kept[kept.len() - 1]) <= epsilon {
        kept.pop();
    }
    kept
}
