pub mod computer;

pub use computer::*;
