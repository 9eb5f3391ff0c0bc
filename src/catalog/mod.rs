mod catalog;
mod lookup;
mod region;
mod source;

pub use catalog::RegionCatalog;
pub use lookup::{close_matches, similarity};
pub use region::{normalize_name, Region};
pub use source::{FieldMap, SourceType};
