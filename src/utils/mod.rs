//! Various unsorted geometrical and logical operators.

pub use self::center::center;
pub use self::sorted_pair::SortedPair;
pub use self::support_point::{indexed_support_point_id, support_point_id};

mod center;
mod sorted_pair;
mod support_point;
