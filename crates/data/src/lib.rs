//! Rules, scripts and match records on disk.

pub mod export;
pub mod import;
pub mod load;
pub mod schema;

pub use export::*;
pub use import::*;
pub use load::*;
pub use schema::*;
