//! Geometry for visualization overlays: box outlines, grid lines and mesh
//! wireframes. Pure data producers; rendering belongs to the host.

use std::collections::HashSet;

use crate::frame::{Point3, Quat, Vec3};

/// Grid overlay lines sit slightly above the surface to avoid z-fighting.
pub const OVERLAY_LIFT: f32 = 0.01;

/// Closed polyline tracing all twelve edges of an oriented box.
///
/// Sixteen vertices: the bottom loop, then up/across/down zigzags covering
/// the vertical edges and the top loop.
pub fn wire_box_outline(center: &Point3, half_extents: &Vec3, rotation: &Quat) -> [Point3; 16] {
    let h = half_extents;
    let corners = [
        Vec3::new(-h.x, -h.y, -h.z),
        Vec3::new(h.x, -h.y, -h.z),
        Vec3::new(h.x, -h.y, h.z),
        Vec3::new(-h.x, -h.y, h.z),
        Vec3::new(-h.x, h.y, -h.z),
        Vec3::new(h.x, h.y, -h.z),
        Vec3::new(h.x, h.y, h.z),
        Vec3::new(-h.x, h.y, h.z),
    ];

    let order = [0, 1, 2, 3, 0, 4, 5, 1, 5, 6, 2, 6, 7, 3, 7, 4];
    order.map(|i| *center + rotation * corners[i])
}

/// One grid overlay line in frame-local coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLine {
    pub start: Point3,
    pub end: Point3,
    /// Major lines are drawn thicker by the host.
    pub major: bool,
}

/// Grid lines covering `±extent` on the XZ plane at the given spacing.
/// Every `major_every`-th line is flagged major.
pub fn grid_overlay_lines(grid_size: f32, extent: f32, major_every: u32) -> Vec<GridLine> {
    if grid_size <= 0.0 || extent <= 0.0 {
        return Vec::new();
    }
    let major_every = major_every.max(1);

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let count = ((extent * 2.0) / grid_size).ceil() as u32;
    let start = -extent;
    let end = extent;

    let mut lines = Vec::with_capacity(2 * (count as usize + 1));

    // Lines along X (varying Z)
    for i in 0..=count {
        #[allow(clippy::cast_precision_loss)]
        let z = start + i as f32 * grid_size;
        lines.push(GridLine {
            start: Point3::new(start, OVERLAY_LIFT, z),
            end: Point3::new(end, OVERLAY_LIFT, z),
            major: i % major_every == 0,
        });
    }

    // Lines along Z (varying X)
    for i in 0..=count {
        #[allow(clippy::cast_precision_loss)]
        let x = start + i as f32 * grid_size;
        lines.push(GridLine {
            start: Point3::new(x, OVERLAY_LIFT, start),
            end: Point3::new(x, OVERLAY_LIFT, end),
            major: i % major_every == 0,
        });
    }

    lines
}

/// Extracts the unique undirected edges of a triangle mesh, first-seen order
/// preserved. Feeds line-topology wireframe rendering.
pub fn mesh_wire_edges(triangles: &[[u32; 3]]) -> Vec<[u32; 2]> {
    let mut seen = HashSet::new();
    let mut edges = Vec::new();

    let mut add_edge = |i1: u32, i2: u32| {
        let (a, b) = if i1 <= i2 { (i1, i2) } else { (i2, i1) };
        let key = (u64::from(a) << 32) | u64::from(b);
        if seen.insert(key) {
            edges.push([a, b]);
        }
    };

    for tri in triangles {
        add_edge(tri[0], tri[1]);
        add_edge(tri[1], tri[2]);
        add_edge(tri[2], tri[0]);
    }

    edges
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_box_outline_spans_extents() {
        let outline = wire_box_outline(
            &Point3::new(1.0, 2.0, 3.0),
            &Vec3::new(0.5, 1.0, 1.5),
            &Quat::identity(),
        );

        for p in &outline {
            assert!((p.x - 1.0).abs() <= 0.5 + 1e-6);
            assert!((p.y - 2.0).abs() <= 1.0 + 1e-6);
            assert!((p.z - 3.0).abs() <= 1.5 + 1e-6);
        }

        // The polyline visits every corner at least once
        let mut distinct = Vec::new();
        for p in &outline {
            if !distinct.iter().any(|q: &Point3| (p - q).norm() < 1e-6) {
                distinct.push(*p);
            }
        }
        assert_eq!(distinct.len(), 8);
    }

    #[test]
    fn test_wire_box_outline_rotates() {
        let rotation = Quat::from_axis_angle(&Vec3::y_axis(), 90.0_f32.to_radians());
        let outline = wire_box_outline(&Point3::origin(), &Vec3::new(2.0, 0.5, 0.5), &rotation);

        // The long axis (local X) now extends along world Z
        let max_z = outline.iter().map(|p| p.z.abs()).fold(0.0, f32::max);
        let max_x = outline.iter().map(|p| p.x.abs()).fold(0.0, f32::max);
        assert!((max_z - 2.0).abs() < 1e-4);
        assert!((max_x - 0.5).abs() < 1e-4);
    }

    #[test]
    fn test_grid_line_counts() {
        // extent 8, grid 0.5: 32 cells, 33 lines per axis
        let lines = grid_overlay_lines(0.5, 8.0, 4);
        assert_eq!(lines.len(), 66);

        let majors = lines.iter().filter(|l| l.major).count();
        assert_eq!(majors, 18);

        for line in &lines {
            assert!((line.start.y - OVERLAY_LIFT).abs() < 1e-6);
            assert!((line.end.y - OVERLAY_LIFT).abs() < 1e-6);
        }
    }

    #[test]
    fn test_grid_lines_empty_on_bad_input() {
        assert!(grid_overlay_lines(0.0, 8.0, 4).is_empty());
        assert!(grid_overlay_lines(0.5, 0.0, 4).is_empty());
    }

    #[test]
    fn test_mesh_wire_edges_unique() {
        // Two triangles sharing the 1-2 edge: 5 unique edges, not 6
        let triangles = [[0, 1, 2], [1, 3, 2]];
        let edges = mesh_wire_edges(&triangles);
        assert_eq!(edges.len(), 5);
        assert_eq!(edges[0], [0, 1]);
        assert!(edges.contains(&[1, 2]));
        assert!(edges.contains(&[1, 3]));
    }

    #[test]
    fn test_cube_mesh_edge_count() {
        // A triangulated cube: 12 triangles, 18 unique edges
        let triangles = [
            [0, 1, 2],
            [0, 2, 3],
            [4, 6, 5],
            [4, 7, 6],
            [0, 4, 5],
            [0, 5, 1],
            [1, 5, 6],
            [1, 6, 2],
            [2, 6, 7],
            [2, 7, 3],
            [3, 7, 4],
            [3, 4, 0],
        ];
        let edges = mesh_wire_edges(&triangles);
        assert_eq!(edges.len(), 18);
    }
}
