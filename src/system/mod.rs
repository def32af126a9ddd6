pub mod collector;
pub mod disk;
pub mod gpu;
pub mod host;
pub mod platform;
pub mod probe;
pub mod sensors;
pub mod snapshot;
