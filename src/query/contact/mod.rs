//! Contact regions between two padded geometries.

use crate::error::GeometryError;
use crate::geometry::GeometryData;
use crate::math::Real;
use crate::query::dispatcher::{validate, QueryKind};
use crate::query::proximity::{Posed, Proximity};
use crate::query::ContactQueryResult;

pub(crate) use self::contact_clustering::cluster_contacts;
pub(crate) use self::contact_pairs::local_contacts;

mod contact_clustering;
mod contact_pairs;

fn check_padding(padding: Real) -> Result<(), GeometryError> {
    if padding.is_finite() && padding >= 0.0 {
        Ok(())
    } else {
        Err(GeometryError::InvalidParameter(format!(
            "the padding must be finite and non-negative, got {padding}"
        )))
    }
}

/// Collects the world-space contacts between `a` padded by `p1` and `b` padded by `p2`.
fn posed_contacts(
    a: &Posed<'_>,
    b: &Posed<'_>,
    p1: Real,
    p2: Real,
    out: &mut Vec<Proximity>,
) -> Result<(), GeometryError> {
    match (a.geom.data(), b.geom.data()) {
        (None, _) | (_, None) => Ok(()),
        (Some(GeometryData::Group(children)), _) => {
            let b_aabb = b.world_aabb();
            a.for_each_child(children, |i, child| {
                if child.world_aabb().distance_to_aabb(&b_aabb) <= p1 + p2 {
                    let start = out.len();
                    posed_contacts(child, b, p1, p2, out)?;
                    out[start..].iter_mut().for_each(|c| c.elem1 = Some(i));
                }
                Ok(())
            })
        }
        (_, Some(GeometryData::Group(children))) => {
            let a_aabb = a.world_aabb();
            b.for_each_child(children, |j, child| {
                if child.world_aabb().distance_to_aabb(&a_aabb) <= p1 + p2 {
                    let start = out.len();
                    posed_contacts(a, child, p1, p2, out)?;
                    out[start..].iter_mut().for_each(|c| c.elem2 = Some(j));
                }
                Ok(())
            })
        }
        _ => {
            if a.geom.is_empty() || b.geom.is_empty() {
                return Ok(());
            }

            let pad1 = a.margin + p1;
            let pad2 = b.margin + p2;
            let pos12 = a.pos.inv_mul(&b.pos);
            let start = out.len();

            local_contacts(a.geom, b.geom, &pos12, pad1 + pad2, out);
            for contact in &mut out[start..] {
                *contact = contact.transform_by(&a.pos).padded(pad1, pad2);
            }
            Ok(())
        }
    }
}

/// Contacts between `a` and `b` padded by `p1` and `p2`, reduced to at most `max_contacts`
/// contacts unless `max_contacts` is zero.
pub(crate) fn query_contacts(
    a: &Posed<'_>,
    b: &Posed<'_>,
    p1: Real,
    p2: Real,
    max_contacts: usize,
) -> Result<ContactQueryResult, GeometryError> {
    check_padding(p1)?;
    check_padding(p2)?;
    validate(QueryKind::Contacts, a, b, (p1, p2))?;

    let mut contacts = Vec::new();
    posed_contacts(a, b, p1, p2, &mut contacts)?;

    if max_contacts > 0 && contacts.len() > max_contacts {
        contacts = cluster_contacts(contacts, max_contacts);
    }

    let mut result = ContactQueryResult::default();
    for contact in contacts {
        result.depths.push((-contact.dist).max(0.0));
        result.points1.push(contact.point1);
        result.points2.push(contact.point2);
        result.normals.push(contact.normal);
        result.elems1.push(contact.elem1);
        result.elems2.push(contact.elem2);
    }

    Ok(result)
}
