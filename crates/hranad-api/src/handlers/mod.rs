//! HTTP request handlers.

mod batch;
mod health;
mod params;
mod pipeline;

pub use batch::batch_v1;
pub use health::{health, method_not_allowed, not_found, probe, protobuf_probe, version};
pub use pipeline::{pipeline_v2, pipeline_v3};
