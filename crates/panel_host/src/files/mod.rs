//! File-hosting models, service contract, and adapters.

pub mod memory;
pub mod path;
pub mod service;
pub mod types;
