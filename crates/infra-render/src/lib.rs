// jobscout Infrastructure - Page Rendering
// Implements: Renderer, RenderSession, RenderPage

mod dom;
pub mod http_renderer;

pub use http_renderer::{HttpRenderer, HttpRendererConfig};
