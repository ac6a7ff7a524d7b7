//! Parent resolution for city, district and town candidates.
//!
//! The gazetteer has no parent ids, so parents are inferred: the country by
//! ISO-2 code, cities and districts by nearest neighbour among the already
//! persisted parents of the same country.

mod context;
mod index;

pub use context::{HierarchyContext, Links};
pub use index::{find_nearest_parent, LinearIndex, ParentIndex, ParentRef, RTreeIndex};
