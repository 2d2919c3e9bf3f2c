//! CLI command implementations

pub mod clear;
pub mod config;
pub mod list;
pub mod size;
pub mod status;
pub mod write;

pub use clear::execute as clear;
pub use config::execute as config;
pub use list::execute as list;
pub use size::execute as size;
pub use status::execute as status;
pub use write::execute as write;
