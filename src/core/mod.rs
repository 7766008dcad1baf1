pub mod config;
pub mod messages;
pub mod pipeline;
pub mod sampler;
pub mod writer;
