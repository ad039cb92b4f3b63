pub mod antimeridian;
pub mod arc_length;
pub mod builder;
pub mod interpolate;
pub mod plan;

pub use antimeridian::*;
pub use arc_length::*;
pub use builder::*;
pub use interpolate::*;
pub use plan::*;
