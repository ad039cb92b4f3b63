//! Animated route renderer: reveals a multi-leg route segment by segment,
//! then loops traveling dots along it.

pub mod config;
pub mod dots;
pub mod driver;
pub mod reveal;
pub mod session;
pub mod state;

pub use config::*;
pub use driver::*;
pub use session::*;
pub use state::*;

#[cfg(test)]
mod test_support;
