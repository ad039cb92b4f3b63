pub mod geodesy;
pub mod sphere;

pub use geodesy::*;
pub use sphere::*;
