pub mod derived;
pub mod price_table;

pub use derived::*;
pub use price_table::*;
