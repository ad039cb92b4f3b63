pub mod frame;
pub mod frame_loop;
pub mod visibility;

pub use frame::*;
pub use frame_loop::*;
pub use visibility::*;
