pub mod descriptions_pipeline;
pub mod details_pipeline;

pub use descriptions_pipeline::{DescriptionTask, DescriptionsPipeline};
pub use details_pipeline::{DetailsPipeline, DetailsTask};
