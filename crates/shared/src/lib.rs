pub mod api;
mod command;
mod key;
pub mod plan;

pub use command::*;
pub use key::*;
