//! Procedural meshes for the course props.
//!
//! All shapes are centred on the origin. Cylinders run along +Y.

use glam::Vec3;
use std::f32::consts::{PI, TAU};

use crate::geometry::GeometryBuffer;

/// Closed cylinder of `radius` and `height` with `segments` sides.
pub fn cylinder(name: &str, radius: f32, height: f32, segments: u32) -> GeometryBuffer {
    let segments = segments.max(3);
    let half = height * 0.5;
    let mut vertices = Vec::with_capacity(segments as usize * 2 + 2);
    for i in 0..segments {
        let a = TAU * i as f32 / segments as f32;
        let (s, c) = a.sin_cos();
        vertices.push(Vec3::new(radius * c, -half, radius * s));
        vertices.push(Vec3::new(radius * c, half, radius * s));
    }
    let bottom = vertices.len() as u32;
    vertices.push(Vec3::new(0.0, -half, 0.0));
    let top = bottom + 1;
    vertices.push(Vec3::new(0.0, half, 0.0));

    let mut indices = Vec::with_capacity(segments as usize * 4);
    for i in 0..segments {
        let j = (i + 1) % segments;
        let (b0, t0, b1, t1) = (2 * i, 2 * i + 1, 2 * j, 2 * j + 1);
        indices.push([b0, t0, b1]);
        indices.push([b1, t0, t1]);
        indices.push([bottom, b0, b1]);
        indices.push([top, t1, t0]);
    }
    GeometryBuffer::new(name, vertices, indices)
}

/// Axis-aligned box with full edge lengths `size`.
pub fn cuboid(name: &str, size: Vec3) -> GeometryBuffer {
    let h = size * 0.5;
    let vertices = (0..8)
        .map(|i| {
            Vec3::new(
                if i & 1 == 0 { -h.x } else { h.x },
                if i & 2 == 0 { -h.y } else { h.y },
                if i & 4 == 0 { -h.z } else { h.z },
            )
        })
        .collect();
    let indices = vec![
        [0, 2, 1],
        [1, 2, 3], // -z
        [4, 5, 6],
        [5, 7, 6], // +z
        [0, 1, 4],
        [1, 5, 4], // -y
        [2, 6, 3],
        [3, 6, 7], // +y
        [0, 4, 2],
        [2, 4, 6], // -x
        [1, 3, 5],
        [3, 7, 5], // +x
    ];
    GeometryBuffer::new(name, vertices, indices)
}

/// Latitude/longitude sphere.
pub fn uv_sphere(name: &str, radius: f32, width_segments: u32, height_segments: u32) -> GeometryBuffer {
    let w = width_segments.max(3);
    let h = height_segments.max(2);
    let mut vertices = Vec::with_capacity(((w + 1) * (h + 1)) as usize);
    for y in 0..=h {
        let theta = PI * y as f32 / h as f32;
        for x in 0..=w {
            let phi = TAU * x as f32 / w as f32;
            vertices.push(Vec3::new(
                -radius * phi.cos() * theta.sin(),
                radius * theta.cos(),
                radius * phi.sin() * theta.sin(),
            ));
        }
    }

    let row = w + 1;
    let mut indices = Vec::new();
    for y in 0..h {
        for x in 0..w {
            let a = y * row + x;
            let b = a + row;
            // Pole rows collapse to a point; skip the zero-area half.
            if y != 0 {
                indices.push([a, b, a + 1]);
            }
            if y != h - 1 {
                indices.push([a + 1, b, b + 1]);
            }
        }
    }
    GeometryBuffer::new(name, vertices, indices)
}

/// Open half-pipe running along X from `-length/2` to `length/2`, sloping
/// down by `drop` over its length. Used as the built-in track.
pub fn trough(
    name: &str,
    length: f32,
    radius: f32,
    drop: f32,
    along: u32,
    around: u32,
) -> GeometryBuffer {
    let along = along.max(1);
    let around = around.max(2);
    let mut vertices = Vec::with_capacity(((along + 1) * (around + 1)) as usize);
    for i in 0..=along {
        let f = i as f32 / along as f32;
        let x = -0.5 * length + f * length;
        let y0 = 0.5 * drop - f * drop;
        for j in 0..=around {
            // Sweep the lower half circle from -z to +z.
            let a = PI + PI * j as f32 / around as f32;
            vertices.push(Vec3::new(x, y0 + radius * a.sin(), radius * a.cos()));
        }
    }

    let row = around + 1;
    let mut indices = Vec::with_capacity((along * around * 2) as usize);
    for i in 0..along {
        for j in 0..around {
            let a = i * row + j;
            let b = a + row;
            indices.push([a, b, a + 1]);
            indices.push([a + 1, b, b + 1]);
        }
    }
    GeometryBuffer::new(name, vertices, indices)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_well_formed(g: &GeometryBuffer) {
        g.validate().unwrap();
        for tri in &g.indices {
            let [a, b, c] = tri.map(|i| g.vertices[i as usize]);
            assert!((b - a).cross(c - a).length() > 1e-8, "{} has a degenerate triangle", g.name);
        }
    }

    #[test]
    fn cylinder_matches_prop_dimensions() {
        let g = cylinder("post", 0.25, 4.0, 16);
        assert_well_formed(&g);
        let (lo, hi) = g.bounds().unwrap();
        assert!((hi.y - lo.y - 4.0).abs() < 1e-6);
        assert!((hi.x - 0.25).abs() < 1e-6);
        assert_eq!(g.triangle_count(), 64);
    }

    #[test]
    fn cuboid_has_twelve_triangles() {
        let g = cuboid("box", Vec3::new(4.0, 0.4, 4.0));
        assert_well_formed(&g);
        assert_eq!(g.vertices.len(), 8);
        assert_eq!(g.triangle_count(), 12);
        assert_eq!(g.bounds().unwrap().1, Vec3::new(2.0, 0.2, 2.0));
    }

    #[test]
    fn sphere_vertices_lie_on_radius() {
        let g = uv_sphere("ball", 0.5, 32, 32);
        assert_well_formed(&g);
        for v in &g.vertices {
            assert!((v.length() - 0.5).abs() < 1e-5);
        }
    }

    #[test]
    fn trough_slopes_down_along_x() {
        let g = trough("track", 20.0, 1.5, 4.0, 24, 12);
        assert_well_formed(&g);
        let first = g.vertices[0];
        let last = g.vertices[g.vertices.len() - 1];
        assert!(first.x < last.x);
        // Rim vertices at both ends: start higher than finish.
        assert!(first.y > last.y);
        let (lo, hi) = g.bounds().unwrap();
        assert!(hi.z - lo.z <= 3.0 + 1e-5);
    }
}
