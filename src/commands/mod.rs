//! CLI command implementations

pub mod charges;
pub mod forecast;
pub mod journal;
