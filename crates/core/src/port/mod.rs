// Port Layer - Interfaces for external collaborators

pub mod record_writer;
pub mod renderer;

// Re-exports
pub use record_writer::RecordWriter;
pub use renderer::{
    ElementHandle, RenderError, RenderPage, RenderSession, Renderer, SessionOptions, Viewport,
    WaitPolicy,
};
