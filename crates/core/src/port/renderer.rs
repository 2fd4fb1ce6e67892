// Renderer Port
// Abstraction over the page-rendering engine (headless browser, HTTP snapshot, ...)

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::application::constants::{
    DEFAULT_NAVIGATION_TIMEOUT, DEFAULT_USER_AGENT, DEFAULT_VIEWPORT_HEIGHT,
    DEFAULT_VIEWPORT_WIDTH,
};

/// When a navigation counts as finished
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WaitPolicy {
    #[default]
    Load,
    DomContentLoaded,
    /// No network connections for a short window (listing pages that load results late)
    NetworkIdle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

/// Options applied to every page of a session
#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub viewport: Viewport,
    /// Per-call timeout enforced by the backend
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            viewport: Viewport {
                width: DEFAULT_VIEWPORT_WIDTH,
                height: DEFAULT_VIEWPORT_HEIGHT,
            },
            timeout: DEFAULT_NAVIGATION_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Reference to one element matched by `wait_for_selector`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementHandle {
    selector: String,
    index: usize,
}

impl ElementHandle {
    pub fn new(selector: impl Into<String>, index: usize) -> Self {
        Self {
            selector: selector.into(),
            index,
        }
    }

    pub fn selector(&self) -> &str {
        &self.selector
    }

    pub fn index(&self) -> usize {
        self.index
    }
}

/// Rendering errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    #[error("Navigation to {url} failed: {message}")]
    Navigation { url: String, message: String },

    #[error("Navigation to {url} returned HTTP {status}")]
    HttpStatus { url: String, status: u16 },

    #[error("Selector not found: {0}")]
    SelectorNotFound(String),

    #[error("Invalid selector: {0}")]
    InvalidSelector(String),

    #[error("Page has no document (navigate first)")]
    NotNavigated,

    #[error("Page already closed")]
    PageClosed,

    #[error("Session already closed")]
    SessionClosed,

    #[error("Backend error: {0}")]
    Backend(String),
}

/// Entry point of a rendering backend
#[async_trait]
pub trait Renderer: Send + Sync {
    /// Open a session; the caller owns it and must close it
    async fn open_session(
        &self,
        options: &SessionOptions,
    ) -> Result<Arc<dyn RenderSession>, RenderError>;
}

/// One rendering session (a browser instance, an HTTP client, ...)
#[async_trait]
pub trait RenderSession: Send + Sync {
    /// Open a fresh page. Pages are never shared between extractions.
    async fn new_page(&self) -> Result<Box<dyn RenderPage>, RenderError>;

    async fn close(&self) -> Result<(), RenderError>;
}

/// One open page
///
/// Selectors are CSS selectors; positional paths use `:nth-of-type`.
#[async_trait]
pub trait RenderPage: Send + Sync {
    async fn navigate(&self, url: &str, wait: WaitPolicy) -> Result<(), RenderError>;

    /// Resolve the first element matching `selector`
    ///
    /// # Errors
    /// - RenderError::SelectorNotFound if nothing matches within the backend timeout
    async fn wait_for_selector(&self, selector: &str) -> Result<ElementHandle, RenderError>;

    /// Text content of a previously resolved element
    async fn evaluate_text(&self, handle: &ElementHandle) -> Result<String, RenderError>;

    /// Text content of every element matching `selector` (empty when none match)
    async fn query_all_text(&self, selector: &str) -> Result<Vec<String>, RenderError>;

    /// Absolute `href` of every element matching `selector`, resolved against the page URL
    async fn query_all_hrefs(&self, selector: &str) -> Result<Vec<String>, RenderError>;

    async fn close(&self) -> Result<(), RenderError>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Scripted content of one URL
    #[derive(Debug, Clone, Default)]
    pub struct MockDocument {
        texts: HashMap<String, Vec<String>>,
        hrefs: HashMap<String, Vec<String>>,
        delay: Option<Duration>,
        panic_on: Option<String>,
    }

    impl MockDocument {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn text(mut self, selector: &str, texts: &[&str]) -> Self {
            self.texts.insert(
                selector.to_string(),
                texts.iter().map(|t| t.to_string()).collect(),
            );
            self
        }

        pub fn hrefs(mut self, selector: &str, hrefs: &[&str]) -> Self {
            self.hrefs.insert(
                selector.to_string(),
                hrefs.iter().map(|h| h.to_string()).collect(),
            );
            self
        }

        /// Delay navigation to this URL
        pub fn delay(mut self, delay: Duration) -> Self {
            self.delay = Some(delay);
            self
        }

        /// Panic when `selector` is queried (panic isolation testing)
        pub fn panic_on(mut self, selector: &str) -> Self {
            self.panic_on = Some(selector.to_string());
            self
        }
    }

    #[derive(Default)]
    struct Counters {
        sessions_opened: usize,
        sessions_closed: usize,
        pages_opened: usize,
        pages_closed: usize,
        open_pages: usize,
        max_open_pages: usize,
        navigations: Vec<String>,
    }

    struct MockState {
        documents: HashMap<String, MockDocument>,
        fail_open: bool,
        counters: Mutex<Counters>,
    }

    /// Mock Renderer serving scripted documents
    ///
    /// Navigating to a URL without a document fails like an unreachable host.
    #[derive(Clone)]
    pub struct MockRenderer {
        state: Arc<MockState>,
    }

    impl MockRenderer {
        pub fn new(documents: impl IntoIterator<Item = (String, MockDocument)>) -> Self {
            Self::build(documents.into_iter().collect(), false)
        }

        /// Renderer whose sessions cannot be opened
        pub fn new_unavailable() -> Self {
            Self::build(HashMap::new(), true)
        }

        fn build(documents: HashMap<String, MockDocument>, fail_open: bool) -> Self {
            Self {
                state: Arc::new(MockState {
                    documents,
                    fail_open,
                    counters: Mutex::new(Counters::default()),
                }),
            }
        }

        pub fn sessions_opened(&self) -> usize {
            self.state.counters.lock().unwrap().sessions_opened
        }
        pub fn sessions_closed(&self) -> usize {
            self.state.counters.lock().unwrap().sessions_closed
        }
        pub fn pages_opened(&self) -> usize {
            self.state.counters.lock().unwrap().pages_opened
        }
        pub fn pages_closed(&self) -> usize {
            self.state.counters.lock().unwrap().pages_closed
        }
        /// Highest number of simultaneously open pages observed
        pub fn max_open_pages(&self) -> usize {
            self.state.counters.lock().unwrap().max_open_pages
        }
        /// URLs in the order navigations started
        pub fn navigations(&self) -> Vec<String> {
            self.state.counters.lock().unwrap().navigations.clone()
        }
    }

    #[async_trait]
    impl Renderer for MockRenderer {
        async fn open_session(
            &self,
            _options: &SessionOptions,
        ) -> Result<Arc<dyn RenderSession>, RenderError> {
            if self.state.fail_open {
                return Err(RenderError::Backend("mock renderer unavailable".to_string()));
            }
            self.state.counters.lock().unwrap().sessions_opened += 1;
            Ok(Arc::new(MockSession {
                state: Arc::clone(&self.state),
                closed: Mutex::new(false),
            }))
        }
    }

    struct MockSession {
        state: Arc<MockState>,
        closed: Mutex<bool>,
    }

    #[async_trait]
    impl RenderSession for MockSession {
        async fn new_page(&self) -> Result<Box<dyn RenderPage>, RenderError> {
            if *self.closed.lock().unwrap() {
                return Err(RenderError::SessionClosed);
            }
            let mut counters = self.state.counters.lock().unwrap();
            counters.pages_opened += 1;
            counters.open_pages += 1;
            counters.max_open_pages = counters.max_open_pages.max(counters.open_pages);
            drop(counters);

            Ok(Box::new(MockPage {
                state: Arc::clone(&self.state),
                current: Mutex::new(None),
                closed: Mutex::new(false),
            }))
        }

        async fn close(&self) -> Result<(), RenderError> {
            let mut closed = self.closed.lock().unwrap();
            if *closed {
                return Err(RenderError::SessionClosed);
            }
            *closed = true;
            self.state.counters.lock().unwrap().sessions_closed += 1;
            Ok(())
        }
    }

    struct MockPage {
        state: Arc<MockState>,
        current: Mutex<Option<MockDocument>>,
        closed: Mutex<bool>,
    }

    impl MockPage {
        fn document(&self, selector: &str) -> Result<MockDocument, RenderError> {
            if *self.closed.lock().unwrap() {
                return Err(RenderError::PageClosed);
            }
            let doc = self
                .current
                .lock()
                .unwrap()
                .clone()
                .ok_or(RenderError::NotNavigated)?;
            if doc.panic_on.as_deref() == Some(selector) {
                panic!("mock page panicked on selector {}", selector);
            }
            Ok(doc)
        }
    }

    #[async_trait]
    impl RenderPage for MockPage {
        async fn navigate(&self, url: &str, _wait: WaitPolicy) -> Result<(), RenderError> {
            if *self.closed.lock().unwrap() {
                return Err(RenderError::PageClosed);
            }
            self.state
                .counters
                .lock()
                .unwrap()
                .navigations
                .push(url.to_string());

            let doc = self
                .state
                .documents
                .get(url)
                .cloned()
                .ok_or_else(|| RenderError::Navigation {
                    url: url.to_string(),
                    message: "host unreachable".to_string(),
                })?;
            if let Some(delay) = doc.delay {
                tokio::time::sleep(delay).await;
            }
            *self.current.lock().unwrap() = Some(doc);
            Ok(())
        }

        async fn wait_for_selector(&self, selector: &str) -> Result<ElementHandle, RenderError> {
            let doc = self.document(selector)?;
            match doc.texts.get(selector) {
                Some(texts) if !texts.is_empty() => Ok(ElementHandle::new(selector, 0)),
                _ => Err(RenderError::SelectorNotFound(selector.to_string())),
            }
        }

        async fn evaluate_text(&self, handle: &ElementHandle) -> Result<String, RenderError> {
            let doc = self.document(handle.selector())?;
            doc.texts
                .get(handle.selector())
                .and_then(|texts| texts.get(handle.index()))
                .cloned()
                .ok_or_else(|| RenderError::SelectorNotFound(handle.selector().to_string()))
        }

        async fn query_all_text(&self, selector: &str) -> Result<Vec<String>, RenderError> {
            let doc = self.document(selector)?;
            Ok(doc.texts.get(selector).cloned().unwrap_or_default())
        }

        async fn query_all_hrefs(&self, selector: &str) -> Result<Vec<String>, RenderError> {
            let doc = self.document(selector)?;
            Ok(doc.hrefs.get(selector).cloned().unwrap_or_default())
        }

        async fn close(&self) -> Result<(), RenderError> {
            let mut closed = self.closed.lock().unwrap();
            if *closed {
                return Err(RenderError::PageClosed);
            }
            *closed = true;
            let mut counters = self.state.counters.lock().unwrap();
            counters.pages_closed += 1;
            counters.open_pages -= 1;
            Ok(())
        }
    }
}
