//! Business logic: data generation, pipeline orchestration, validation

pub mod generator;
pub mod pipeline;
pub mod validation;

pub use generator::{GeneratedCounts, generate};
pub use pipeline::PipelineError;
pub use validation::{ValidationError, table_counts, validate};
