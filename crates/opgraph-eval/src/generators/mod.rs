mod filter;
mod group_by;

pub use filter::{exclude, filter, Filter, FilterMode};
pub use group_by::{group_by, GroupBy};
