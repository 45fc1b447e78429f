use crate::math::{Point, Real};
use crate::query::Ray;
use crate::shape::Segment;
use num::Zero;

/// Computes the time of impact of a ray on a ball.
///
/// The first result element is `true` if the ray started inside of the ball.
#[inline]
pub fn ray_toi_with_ball(
    center: &Point<Real>,
    radius: Real,
    ray: &Ray,
    solid: bool,
) -> (bool, Option<Real>) {
    let dcenter = ray.origin - *center;

    let a = ray.dir.norm_squared();
    let b = dcenter.dot(&ray.dir);
    let c = dcenter.norm_squared() - radius * radius;

    // Special case for when the dir is zero.
    if a.is_zero() {
        if c > 0.0 {
            return (false, None);
        } else {
            return (true, Some(0.0));
        }
    }

    if c > 0.0 && b > 0.0 {
        (false, None)
    } else {
        let delta = b * b - a * c;

        if delta < 0.0 {
            // no solution
            (false, None)
        } else {
            let t = (-b - delta.sqrt()) / a;

            if t <= 0.0 {
                // origin inside of the ball
                if solid {
                    (true, Some(0.0))
                } else {
                    (true, Some((-b + delta.sqrt()) / a))
                }
            } else {
                (false, Some(t))
            }
        }
    }
}

/// Computes the time of impact of a ray on a capsule, i.e., the set of points at distance at
/// most `radius` from `segment`.
///
/// The first result element is `true` if the ray started inside of the capsule.
pub fn ray_toi_with_capsule(
    segment: &Segment,
    radius: Real,
    ray: &Ray,
    solid: bool,
) -> (bool, Option<Real>) {
    let axis = segment.scaled_direction();
    let sq_len = axis.norm_squared();

    if sq_len.is_zero() {
        return ray_toi_with_ball(&segment.a, radius, ray, solid);
    }

    let (proj, _) = segment.project_local_point_and_get_location(&ray.origin);

    if na::distance_squared(&proj, &ray.origin) <= radius * radius {
        return if solid {
            (true, Some(0.0))
        } else {
            (true, exit_time_of_capsule(segment, radius, ray))
        };
    }

    let mut best: Option<Real> = None;
    let mut keep_best = |t: Real| {
        if t >= 0.0 && best.map(|b| t < b).unwrap_or(true) {
            best = Some(t);
        }
    };

    // The caps.
    for center in [segment.a, segment.b] {
        if let (_, Some(t)) = ray_toi_with_ball(&center, radius, ray, solid) {
            keep_best(t);
        }
    }

    // The cylindrical part.
    let m = ray.origin - segment.a;
    let d_perp = ray.dir - axis * (ray.dir.dot(&axis) / sq_len);
    let m_perp = m - axis * (m.dot(&axis) / sq_len);
    let a = d_perp.norm_squared();

    if !a.is_zero() {
        let b = m_perp.dot(&d_perp);
        let c = m_perp.norm_squared() - radius * radius;
        let delta = b * b - a * c;

        if delta >= 0.0 {
            let t = (-b - delta.sqrt()) / a;
            let along = (m + ray.dir * t).dot(&axis);
            if along >= 0.0 && along <= sq_len {
                keep_best(t);
            }
        }
    }

    (false, best)
}

// Bisection on the (convex) capsule membership along the ray, starting from an inside origin.
fn exit_time_of_capsule(segment: &Segment, radius: Real, ray: &Ray) -> Option<Real> {
    let inside = |t: Real| {
        let pt = ray.point_at(t);
        let (proj, _) = segment.project_local_point_and_get_location(&pt);
        na::distance_squared(&proj, &pt) <= radius * radius
    };

    let dir_norm = ray.dir.norm();
    if dir_norm.is_zero() {
        return Some(0.0);
    }

    let mut hi = (segment.length() + 2.0 * radius + na::distance(&ray.origin, &segment.a)) / dir_norm;
    while inside(hi) {
        hi *= 2.0;
    }

    let mut lo = 0.0;
    for _ in 0..60 {
        let mid = (lo + hi) * 0.5;
        if inside(mid) {
            lo = mid;
        } else {
            hi = mid;
        }
    }

    Some(lo)
}
