pub mod geojson;
pub mod places;

pub use geojson::*;
pub use places::*;
