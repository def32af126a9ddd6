pub mod classify;
pub mod config;
pub mod error;
pub mod queue;
pub mod report;
pub mod sampler;
pub mod system;
