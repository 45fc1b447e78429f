//! Low-level helpers for building vertex and index buffers.

use crate::math::{Point, Real};

/// Pushes a discretized counterclockwise circle of the plane `y = y`, centered on the y axis.
pub fn push_circle(radius: Real, nsubdiv: u32, dtheta: Real, y: Real, out: &mut Vec<Point<Real>>) {
    let mut curr_theta: Real = 0.0;

    for _ in 0..nsubdiv {
        out.push(Point::new(curr_theta.cos() * radius, y, curr_theta.sin() * radius));
        curr_theta += dtheta;
    }
}

/// Creates the two triangles of a quad.
#[inline]
pub fn push_rectangle_indices(ul: u32, ur: u32, dl: u32, dr: u32, out: &mut Vec<[u32; 3]>) {
    out.push([ul, dl, dr]);
    out.push([dr, ur, ul]);
}

/// Creates the faces of the closed band between two circles of `nsubdiv` points.
pub fn push_ring_indices(
    base_lower_circle: u32,
    base_upper_circle: u32,
    nsubdiv: u32,
    out: &mut Vec<[u32; 3]>,
) {
    for i in 0..nsubdiv - 1 {
        let bli = base_lower_circle + i;
        let bui = base_upper_circle + i;
        push_rectangle_indices(bui + 1, bui, bli + 1, bli, out);
    }

    push_rectangle_indices(
        base_upper_circle,
        base_upper_circle + nsubdiv - 1,
        base_lower_circle,
        base_lower_circle + nsubdiv - 1,
        out,
    );
}

/// Creates the fan between a circle and an apex above it.
pub fn push_top_fan_indices(base_circle: u32, apex: u32, nsubdiv: u32, out: &mut Vec<[u32; 3]>) {
    for i in 0..nsubdiv - 1 {
        out.push([base_circle + i, apex, base_circle + i + 1]);
    }

    out.push([base_circle + nsubdiv - 1, apex, base_circle]);
}

/// Creates the fan between a circle and an apex below it.
pub fn push_bottom_fan_indices(base_circle: u32, apex: u32, nsubdiv: u32, out: &mut Vec<[u32; 3]>) {
    for i in 0..nsubdiv - 1 {
        out.push([base_circle + i + 1, apex, base_circle + i]);
    }

    out.push([base_circle, apex, base_circle + nsubdiv - 1]);
}

/// Number of subdivisions needed to discretize `length` with steps of at most `step`.
pub(crate) fn subdivisions(length: Real, step: Real, min: u32, max: u32) -> u32 {
    if !(step > 0.0) || !length.is_finite() {
        return min;
    }

    ((length / step).ceil() as u32).clamp(min, max)
}
