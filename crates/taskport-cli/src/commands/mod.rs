//! CLI command implementations.

pub mod check;
pub mod export;

pub use check::execute as check_execute;
pub use export::execute as export_execute;
