use nalgebra as na;
use serde::Serialize;

use crate::geometry::plane::Plane;

/// A polygon whose vertices lie on a carrier plane.
///
/// The vertex ring may be degenerate (coincident or collinear points); such
/// polygons report zero area and contain nothing.
#[derive(Debug, Clone, Serialize)]
pub struct Polygon3 {
    vertices: Vec<na::Point3<f64>>,
    plane: Plane,
}

/// Result of clipping a polygon with the vertical line through a point.
#[derive(Debug, Clone, Copy)]
pub enum VerticalClip {
    Segment {
        top: na::Point3<f64>,
        bottom: na::Point3<f64>,
        /// Boundary crossings beyond the expected two.
        extra_crossings: usize,
    },
    /// No usable segment (horizontal carrier plane or fewer than two
    /// crossings).
    Degenerate,
}

impl Polygon3 {
    /// Returns `None` for fewer than 3 vertices.
    pub fn new(vertices: Vec<na::Point3<f64>>, plane: Plane) -> Option<Self> {
        if vertices.len() < 3 {
            return None;
        }
        Some(Self { vertices, plane })
    }

    /// Convex hull of `points` in the frame of `plane`.
    ///
    /// Falls back to the raw point list (a degenerate, zero-area ring) when
    /// the points do not span two dimensions. Returns `None` for fewer than
    /// 3 points.
    pub fn convex_hull(points: &[na::Point3<f64>], plane: Plane) -> Option<Self> {
        if points.len() < 3 {
            return None;
        }

        let mut local: Vec<(f64, f64, usize)> = points
            .iter()
            .enumerate()
            .map(|(idx, p)| {
                let (u, v) = plane.to_local(p);
                (u, v, idx)
            })
            .collect();
        local.sort_by(|a, b| (a.0, a.1).partial_cmp(&(b.0, b.1)).unwrap_or(std::cmp::Ordering::Equal));

        let turn = |o: &(f64, f64, usize), a: &(f64, f64, usize), b: &(f64, f64, usize)| {
            (a.0 - o.0) * (b.1 - o.1) - (a.1 - o.1) * (b.0 - o.0)
        };

        // Monotone chain, strict turns only (collinear points dropped)
        let mut lower: Vec<(f64, f64, usize)> = Vec::new();
        for p in &local {
            while lower.len() >= 2 && turn(&lower[lower.len() - 2], &lower[lower.len() - 1], p) <= 1e-12 {
                lower.pop();
            }
            lower.push(*p);
        }
        let mut upper: Vec<(f64, f64, usize)> = Vec::new();
        for p in local.iter().rev() {
            while upper.len() >= 2 && turn(&upper[upper.len() - 2], &upper[upper.len() - 1], p) <= 1e-12 {
                upper.pop();
            }
            upper.push(*p);
        }

        lower.pop();
        upper.pop();
        lower.extend(upper);

        if lower.len() < 3 {
            // Degenerate spread; keep the raw ring so callers can still see it
            return Self::new(points.to_vec(), plane);
        }

        Some(Self {
            vertices: lower.into_iter().map(|(_, _, idx)| points[idx]).collect(),
            plane,
        })
    }

    pub fn vertices(&self) -> &[na::Point3<f64>] {
        &self.vertices
    }

    pub fn plane(&self) -> &Plane {
        &self.plane
    }

    fn local_ring(&self) -> Vec<(f64, f64)> {
        self.vertices.iter().map(|p| self.plane.to_local(p)).collect()
    }

    fn signed_area_2d(ring: &[(f64, f64)]) -> f64 {
        let n = ring.len();
        let mut sum = 0.0;
        for i in 0..n {
            let (x0, y0) = ring[i];
            let (x1, y1) = ring[(i + 1) % n];
            sum += x0 * y1 - x1 * y0;
        }
        sum / 2.0
    }

    pub fn area(&self) -> f64 {
        Self::signed_area_2d(&self.local_ring()).abs()
    }

    /// Area centroid; degenerate rings fall back to the vertex average.
    pub fn centroid(&self) -> na::Point3<f64> {
        let ring = self.local_ring();
        let signed = Self::signed_area_2d(&ring);

        if signed.abs() < 1e-12 {
            let sum: na::Vector3<f64> = self.vertices.iter().map(|p| p.coords).sum();
            return na::Point3::from(sum / self.vertices.len() as f64);
        }

        let n = ring.len();
        let mut cx = 0.0;
        let mut cy = 0.0;
        for i in 0..n {
            let (x0, y0) = ring[i];
            let (x1, y1) = ring[(i + 1) % n];
            let w = x0 * y1 - x1 * y0;
            cx += (x0 + x1) * w;
            cy += (y0 + y1) * w;
        }
        self.plane.from_local(cx / (6.0 * signed), cy / (6.0 * signed))
    }

    /// Containment test with an inclusive boundary band of width `tolerance`
    /// (plane units). The point is projected onto the carrier plane first.
    pub fn contains(&self, point: &na::Point3<f64>, tolerance: f64) -> bool {
        let ring = self.local_ring();
        let (px, py) = self.plane.to_local(point);
        let n = ring.len();

        // Within tolerance of an edge counts as inside
        for i in 0..n {
            let (ax, ay) = ring[i];
            let (bx, by) = ring[(i + 1) % n];
            let (ex, ey) = (bx - ax, by - ay);
            let len2 = ex * ex + ey * ey;
            let t = if len2 < 1e-18 {
                0.0
            } else {
                (((px - ax) * ex + (py - ay) * ey) / len2).clamp(0.0, 1.0)
            };
            let (dx, dy) = (px - (ax + t * ex), py - (ay + t * ey));
            if (dx * dx + dy * dy).sqrt() <= tolerance {
                return true;
            }
        }

        // Crossing parity
        let mut inside = false;
        for i in 0..n {
            let (ax, ay) = ring[i];
            let (bx, by) = ring[(i + 1) % n];
            if (ay > py) != (by > py) {
                let x_int = ax + (py - ay) / (by - ay) * (bx - ax);
                if x_int > px {
                    inside = !inside;
                }
            }
        }
        inside
    }

    /// Clip the vertical (global +Z) line through `point` against the
    /// polygon outline.
    ///
    /// With more than two boundary crossings the extreme pair is kept and
    /// reported via `extra_crossings`.
    pub fn clip_vertical(&self, point: &na::Point3<f64>) -> VerticalClip {
        let n_vec = self.plane.normal().into_inner();
        let vertical = na::Vector3::z() - n_vec * n_vec.z;
        if vertical.norm() < 1e-9 {
            return VerticalClip::Degenerate;
        }

        let (e1, e2) = self.plane.basis();
        let dir = (vertical.dot(&e1), vertical.dot(&e2));
        let dir_norm = (dir.0 * dir.0 + dir.1 * dir.1).sqrt();
        let dir = (dir.0 / dir_norm, dir.1 / dir_norm);

        let (cx, cy) = self.plane.to_local(point);
        let ring = self.local_ring();
        let n = ring.len();

        let mut crossings: Vec<f64> = Vec::new();
        for i in 0..n {
            let (ax, ay) = ring[i];
            let (bx, by) = ring[(i + 1) % n];
            let (ex, ey) = (bx - ax, by - ay);
            let denom = dir.0 * ey - dir.1 * ex;
            if denom.abs() < 1e-12 {
                continue;
            }
            let (dx, dy) = (ax - cx, ay - cy);
            let t = (dx * ey - dy * ex) / denom;
            let s = (dx * dir.1 - dy * dir.0) / denom;
            if (0.0..1.0).contains(&s) {
                crossings.push(t);
            }
        }

        crossings.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        crossings.dedup_by(|a, b| (*a - *b).abs() < 1e-7);

        if crossings.len() < 2 {
            return VerticalClip::Degenerate;
        }

        // `vertical` has a positive Z component, so the largest parameter is
        // the topmost crossing
        let t_top = *crossings.last().unwrap_or(&0.0);
        let t_bottom = crossings[0];
        VerticalClip::Segment {
            top: self.plane.from_local(cx + t_top * dir.0, cy + t_top * dir.1),
            bottom: self.plane.from_local(cx + t_bottom * dir.0, cy + t_bottom * dir.1),
            extra_crossings: crossings.len() - 2,
        }
    }
}
