pub mod defs;
pub mod loader;
pub mod mapping;
