//! Reduction of a contact set to a bounded number of representative contacts.

use ordered_float::OrderedFloat;

use crate::math::{Point, Real};
use crate::query::proximity::Proximity;

const LLOYD_ITERATIONS: usize = 4;

fn position(contact: &Proximity) -> Point<Real> {
    na::center(&contact.point1, &contact.point2)
}

fn deepest(contacts: &[Proximity], members: impl Iterator<Item = usize>) -> Option<usize> {
    members.min_by_key(|i| (OrderedFloat(contacts[*i].dist), *i))
}

fn nearest_center(pt: &Point<Real>, centers: &[Point<Real>]) -> usize {
    (0..centers.len())
        .min_by_key(|c| (OrderedFloat(na::distance_squared(pt, &centers[*c])), *c))
        .unwrap_or(0)
}

/// Keeps at most `max_contacts` contacts, each being the deepest contact of a spatial cluster.
///
/// Clusters are seeded by farthest-point sampling from the deepest contact, then refined by
/// a few Lloyd iterations. The kept contacts are copied from the input, never averaged.
pub(crate) fn cluster_contacts(contacts: Vec<Proximity>, max_contacts: usize) -> Vec<Proximity> {
    if max_contacts == 0 || contacts.len() <= max_contacts {
        return contacts;
    }

    let positions: Vec<_> = contacts.iter().map(position).collect();
    let Some(first) = deepest(&contacts, 0..contacts.len()) else {
        return contacts;
    };

    let mut seeds = vec![first];
    let mut min_dist2: Vec<Real> = positions
        .iter()
        .map(|pt| na::distance_squared(pt, &positions[first]))
        .collect();

    while seeds.len() < max_contacts {
        let Some(next) = (0..positions.len()).max_by_key(|i| (OrderedFloat(min_dist2[*i]), std::cmp::Reverse(*i))) else {
            break;
        };
        if min_dist2[next] == 0.0 {
            // All remaining contacts coincide with a seed.
            break;
        }

        seeds.push(next);
        for (d2, pt) in min_dist2.iter_mut().zip(&positions) {
            *d2 = d2.min(na::distance_squared(pt, &positions[next]));
        }
    }

    let mut centers: Vec<_> = seeds.iter().map(|i| positions[*i]).collect();
    let mut assignment = vec![0; positions.len()];

    for iter in 0..=LLOYD_ITERATIONS {
        for (a, pt) in assignment.iter_mut().zip(&positions) {
            *a = nearest_center(pt, &centers);
        }

        if iter == LLOYD_ITERATIONS {
            break;
        }

        let mut sums = vec![(Point::origin(), 0usize); centers.len()];
        for (a, pt) in assignment.iter().zip(&positions) {
            sums[*a].0 += pt.coords;
            sums[*a].1 += 1;
        }

        for (center, (sum, count)) in centers.iter_mut().zip(sums) {
            if count > 0 {
                *center = sum / count as Real;
            }
        }
    }

    log::trace!("clustered {} contacts into {} clusters", contacts.len(), centers.len());

    (0..centers.len())
        .filter_map(|c| deepest(&contacts, (0..contacts.len()).filter(|i| assignment[*i] == c)))
        .map(|i| contacts[i])
        .collect()
}

#[cfg(test)]
mod test {
    use super::cluster_contacts;
    use crate::math::{Point, Real, Vector};
    use crate::query::proximity::Proximity;

    fn contact(x: Real, depth: Real) -> Proximity {
        let p1 = Point::new(x, 0.0, 0.0);
        Proximity::new(-depth, p1, p1 - Vector::z() * depth, Vector::z())
    }

    #[test]
    fn two_patches_keep_their_deepest_contacts() {
        let contacts = vec![
            contact(0.0, 0.1),
            contact(0.1, 0.3),
            contact(0.2, 0.2),
            contact(10.0, 0.05),
            contact(10.1, 0.15),
        ];

        let clustered = cluster_contacts(contacts.clone(), 2);
        assert_eq!(clustered.len(), 2);
        assert!(clustered.contains(&contacts[1]));
        assert!(clustered.contains(&contacts[4]));
    }

    #[test]
    fn small_sets_are_left_untouched() {
        let contacts = vec![contact(0.0, 0.1), contact(1.0, 0.2)];
        assert_eq!(cluster_contacts(contacts.clone(), 0), contacts);
        assert_eq!(cluster_contacts(contacts.clone(), 5), contacts);
    }
}
