pub mod charts;
pub mod dashboard;
pub mod svg;

pub use charts::*;
pub use dashboard::*;
