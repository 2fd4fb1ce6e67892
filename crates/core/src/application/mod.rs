// Application Layer - Pipeline stages and driver

pub mod constants;
pub mod dedupe;
pub mod discovery;
pub mod extraction;
pub mod input;
pub mod output;
pub mod panic_guard;
pub mod pipeline;

// Re-exports
pub use discovery::DiscoveryStage;
pub use extraction::{ExtractionOutcome, ExtractionReport, ExtractionStage};
pub use input::{parse_link_list, render_link_list};
pub use output::{safe_stem, OutputNamer};
pub use pipeline::{ExtractionRun, Pipeline, PipelineConfig};
