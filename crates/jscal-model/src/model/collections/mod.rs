//! Typed views over map and list values.

mod list;
mod map;

pub use list::List;
pub use map::{Map, MapKey, parse_local_date_time};
