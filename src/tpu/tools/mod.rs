pub mod consolidate;
pub mod error;
pub mod extract;
pub mod io;
pub mod model;
pub mod schema;

pub use error::{Result, ToolError};
