//! Application layer - the collection pipeline

pub mod pipeline;

pub use pipeline::{Pipeline, PipelineRun};
