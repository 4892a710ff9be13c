pub mod csv_service;
pub mod sector_cache;
pub mod sector_fetch;

pub use csv_service::*;
pub use sector_cache::*;
pub use sector_fetch::*;
