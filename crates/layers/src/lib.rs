pub mod layer;
pub mod memory;
pub mod resources;
pub mod surface;
pub mod symbology;
pub mod vector;

pub use layer::*;
pub use memory::*;
pub use resources::*;
pub use surface::*;
pub use symbology::*;
pub use vector::*;
