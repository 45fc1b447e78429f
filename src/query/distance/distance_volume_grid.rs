//! Distance between the level set of a volume grid and a primitive.
//!
//! The grid is read as a signed distance field. Primitives that are not a point swept by a
//! ball are sampled, so the result is exact only up to the grid resolution.

use crate::math::{Isometry, Point, Real, Vector};
use crate::query::distance::distance_point::grid_point;
use crate::query::distance::distance_primitive::RoundCore;
use crate::query::proximity::Proximity;
use crate::shape::{Primitive, Segment, VolumeGrid};

const MAX_SEGMENT_SAMPLES: usize = 1024;
const MAX_BOX_SAMPLES_PER_AXIS: usize = 32;
const REFINEMENT_STEPS: usize = 32;

fn num_samples(length: Real, step: Real, max: usize) -> usize {
    if step > 0.0 && length.is_finite() {
        ((length / step).ceil() as usize + 1).clamp(2, max)
    } else {
        2
    }
}

/// Minimizes `f` over `[a, b]`, assuming it is unimodal there.
fn golden_section_min(mut a: Real, mut b: Real, f: impl Fn(Real) -> Real) -> Real {
    let inv_phi = (5.0_f64.sqrt() - 1.0) / 2.0;
    let mut c = b - (b - a) * inv_phi;
    let mut d = a + (b - a) * inv_phi;
    let (mut fc, mut fd) = (f(c), f(d));

    for _ in 0..REFINEMENT_STEPS {
        if fc < fd {
            b = d;
            d = c;
            fd = fc;
            c = b - (b - a) * inv_phi;
            fc = f(c);
        } else {
            a = c;
            c = d;
            fc = fd;
            d = a + (b - a) * inv_phi;
            fd = f(d);
        }
    }

    (a + b) * 0.5
}

fn grid_segment(grid: &VolumeGrid, seg: &Segment) -> Proximity {
    let step = grid.cell_size().min();
    let n = num_samples(seg.length(), step, MAX_SEGMENT_SAMPLES);
    let field = |t: Real| grid.signed_distance(&seg.point_at(t));
    let dt = 1.0 / (n - 1) as Real;

    let mut best = (field(0.0), 0);
    for k in 1..n {
        let d = field(k as Real * dt);
        if d < best.0 {
            best = (d, k);
        }
    }

    let lo = (best.1 as Real - 1.0).max(0.0) * dt;
    let hi = ((best.1 + 1) as Real * dt).min(1.0);
    let t = golden_section_min(lo, hi, field);
    let t = if field(t) < best.0 { t } else { best.1 as Real * dt };

    grid_point(grid, &seg.point_at(t))
}

fn grid_box(grid: &VolumeGrid, mins: &Point<Real>, maxs: &Point<Real>, pos12: &Isometry<Real>) -> Proximity {
    let step = grid.cell_size().min();
    let extents = maxs - mins;
    let counts: [usize; 3] = [0, 1, 2].map(|i| num_samples(extents[i], step, MAX_BOX_SAMPLES_PER_AXIS));

    let mut best: Option<(Real, Point<Real>)> = None;
    for i in 0..counts[0] {
        for j in 0..counts[1] {
            for k in 0..counts[2] {
                let frac = Vector::new(
                    i as Real / (counts[0] - 1) as Real,
                    j as Real / (counts[1] - 1) as Real,
                    k as Real / (counts[2] - 1) as Real,
                );
                let pt = pos12 * (mins + extents.component_mul(&frac));
                let d = grid.signed_distance(&pt);
                if best.map(|b| d < b.0).unwrap_or(true) {
                    best = Some((d, pt));
                }
            }
        }
    }

    let pt = best.map(|b| b.1).unwrap_or_else(|| pos12 * mins);
    grid_point(grid, &pt)
}

/// Signed distance between a grid and a primitive placed by `pos12` in the frame of the grid.
pub(crate) fn grid_primitive(
    grid: &VolumeGrid,
    prim: &Primitive,
    pos12: &Isometry<Real>,
    max_dist: Real,
) -> Option<Proximity> {
    let prox = match (prim, RoundCore::of(prim)) {
        (_, Some((RoundCore::Point(c), r))) => grid_point(grid, &(pos12 * c)).padded(0.0, r),
        (_, Some((RoundCore::Segment(seg), _))) => grid_segment(grid, &seg.transformed(pos12)),
        (Primitive::Aabb { mins, maxs }, None) => grid_box(grid, mins, maxs, pos12),
        _ => return None,
    };

    (prox.dist < max_dist).then_some(prox)
}
