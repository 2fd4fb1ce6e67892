// HTTP renderer
// reason: reqwest for fetching, scraper for CSS queries over the fetched document
//
// Without a Browserless endpoint pages are fetched directly (no JavaScript).
// With one, pages are rendered by Browserless `/content`, which honours the
// wait policy and viewport.

use async_trait::async_trait;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info};
use url::Url;

use jobscout_core::port::{
    ElementHandle, RenderError, RenderPage, RenderSession, Renderer, SessionOptions, Viewport,
    WaitPolicy,
};

use crate::dom;

/// Maximum redirects followed per navigation
const MAX_REDIRECTS: usize = 5;

/// Backend selection
#[derive(Debug, Clone, Default)]
pub struct HttpRendererConfig {
    /// Base URL of a Browserless instance (e.g. `http://localhost:3000`)
    pub browserless_url: Option<String>,
    pub browserless_token: Option<String>,
}

/// Renderer opening one HTTP client per session
pub struct HttpRenderer {
    config: HttpRendererConfig,
}

impl HttpRenderer {
    pub fn new(config: HttpRendererConfig) -> Self {
        Self { config }
    }

    fn backend(&self) -> Backend {
        match &self.config.browserless_url {
            Some(base) => Backend::Browserless {
                endpoint: format!("{}/content", base.trim_end_matches('/')),
                token: self.config.browserless_token.clone(),
            },
            None => Backend::Direct,
        }
    }
}

#[async_trait]
impl Renderer for HttpRenderer {
    async fn open_session(
        &self,
        options: &SessionOptions,
    ) -> Result<Arc<dyn RenderSession>, RenderError> {
        let client = reqwest::Client::builder()
            .timeout(options.timeout)
            .user_agent(options.user_agent.as_str())
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .build()
            .map_err(|e| RenderError::Backend(format!("failed to build HTTP client: {}", e)))?;

        let backend = self.backend();
        info!(backend = backend.name(), "Opened HTTP render session");

        Ok(Arc::new(HttpSession {
            fetcher: Arc::new(Fetcher {
                client,
                backend,
                viewport: options.viewport,
                timeout_ms: u64::try_from(options.timeout.as_millis()).unwrap_or(u64::MAX),
            }),
            closed: AtomicBool::new(false),
        }))
    }
}

#[derive(Debug, Clone)]
enum Backend {
    Direct,
    Browserless {
        endpoint: String,
        token: Option<String>,
    },
}

impl Backend {
    fn name(&self) -> &'static str {
        match self {
            Backend::Direct => "direct",
            Backend::Browserless { .. } => "browserless",
        }
    }
}

/// Browserless `/content` request body
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ContentRequest<'a> {
    url: &'a str,
    goto_options: GotoOptions,
    viewport: BrowserlessViewport,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GotoOptions {
    wait_until: &'static str,
    timeout: u64,
}

#[derive(Serialize)]
struct BrowserlessViewport {
    width: u32,
    height: u32,
}

fn wait_until(wait: WaitPolicy) -> &'static str {
    match wait {
        WaitPolicy::Load => "load",
        WaitPolicy::DomContentLoaded => "domcontentloaded",
        WaitPolicy::NetworkIdle => "networkidle0",
    }
}

/// Shared by every page of a session
struct Fetcher {
    client: reqwest::Client,
    backend: Backend,
    viewport: Viewport,
    timeout_ms: u64,
}

impl Fetcher {
    /// Fetch the document at `url`, returning the final URL and its HTML
    async fn fetch(&self, url: &str, wait: WaitPolicy) -> Result<(Url, String), RenderError> {
        let target = Url::parse(url).map_err(|e| RenderError::Navigation {
            url: url.to_string(),
            message: e.to_string(),
        })?;

        match &self.backend {
            Backend::Direct => {
                let response = self
                    .client
                    .get(target)
                    .send()
                    .await
                    .map_err(|e| navigation_error(url, e))?;

                let status = response.status();
                if !status.is_success() {
                    return Err(RenderError::HttpStatus {
                        url: url.to_string(),
                        status: status.as_u16(),
                    });
                }

                let final_url = response.url().clone();
                let html = response.text().await.map_err(|e| navigation_error(url, e))?;
                Ok((final_url, html))
            }
            Backend::Browserless { endpoint, token } => {
                let body = ContentRequest {
                    url,
                    goto_options: GotoOptions {
                        wait_until: wait_until(wait),
                        timeout: self.timeout_ms,
                    },
                    viewport: BrowserlessViewport {
                        width: self.viewport.width,
                        height: self.viewport.height,
                    },
                };

                let mut request = self.client.post(endpoint.as_str()).json(&body);
                if let Some(token) = token {
                    request = request.query(&[("token", token.as_str())]);
                }

                let response = request.send().await.map_err(|e| navigation_error(url, e))?;
                let status = response.status();
                if !status.is_success() {
                    let message = response.text().await.unwrap_or_default();
                    return Err(RenderError::Backend(format!(
                        "browserless returned {} for {}: {}",
                        status.as_u16(),
                        url,
                        message.trim()
                    )));
                }

                let html = response.text().await.map_err(|e| navigation_error(url, e))?;
                Ok((target, html))
            }
        }
    }
}

fn navigation_error(url: &str, e: reqwest::Error) -> RenderError {
    let message = if e.is_timeout() {
        "timed out".to_string()
    } else {
        e.to_string()
    };
    RenderError::Navigation {
        url: url.to_string(),
        message,
    }
}

struct HttpSession {
    fetcher: Arc<Fetcher>,
    closed: AtomicBool,
}

#[async_trait]
impl RenderSession for HttpSession {
    async fn new_page(&self) -> Result<Box<dyn RenderPage>, RenderError> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(RenderError::SessionClosed);
        }
        Ok(Box::new(HttpPage {
            fetcher: Arc::clone(&self.fetcher),
            state: Mutex::new(PageState::default()),
        }))
    }

    async fn close(&self) -> Result<(), RenderError> {
        if self.closed.swap(true, Ordering::SeqCst) {
            return Err(RenderError::SessionClosed);
        }
        debug!("Closed HTTP render session");
        Ok(())
    }
}

/// Fetched document of a page
#[derive(Clone)]
struct Snapshot {
    url: Url,
    html: Arc<str>,
}

#[derive(Default)]
struct PageState {
    snapshot: Option<Snapshot>,
    closed: bool,
}

struct HttpPage {
    fetcher: Arc<Fetcher>,
    state: Mutex<PageState>,
}

impl HttpPage {
    fn lock(&self) -> MutexGuard<'_, PageState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn snapshot(&self) -> Result<Snapshot, RenderError> {
        let state = self.lock();
        if state.closed {
            return Err(RenderError::PageClosed);
        }
        state.snapshot.clone().ok_or(RenderError::NotNavigated)
    }
}

#[async_trait]
impl RenderPage for HttpPage {
    async fn navigate(&self, url: &str, wait: WaitPolicy) -> Result<(), RenderError> {
        if self.lock().closed {
            return Err(RenderError::PageClosed);
        }

        let (final_url, html) = self.fetcher.fetch(url, wait).await?;
        debug!(url = %url, bytes = html.len(), "Fetched page");

        self.lock().snapshot = Some(Snapshot {
            url: final_url,
            html: html.into(),
        });
        Ok(())
    }

    async fn wait_for_selector(&self, selector: &str) -> Result<ElementHandle, RenderError> {
        // A fetched document never changes, so the first check is final
        let snapshot = self.snapshot()?;
        if dom::count_matches(&snapshot.html, selector)? == 0 {
            return Err(RenderError::SelectorNotFound(selector.to_string()));
        }
        Ok(ElementHandle::new(selector, 0))
    }

    async fn evaluate_text(&self, handle: &ElementHandle) -> Result<String, RenderError> {
        let snapshot = self.snapshot()?;
        dom::select_texts(&snapshot.html, handle.selector())?
            .into_iter()
            .nth(handle.index())
            .ok_or_else(|| RenderError::SelectorNotFound(handle.selector().to_string()))
    }

    async fn query_all_text(&self, selector: &str) -> Result<Vec<String>, RenderError> {
        let snapshot = self.snapshot()?;
        dom::select_texts(&snapshot.html, selector)
    }

    async fn query_all_hrefs(&self, selector: &str) -> Result<Vec<String>, RenderError> {
        let snapshot = self.snapshot()?;
        dom::select_hrefs(&snapshot.html, &snapshot.url, selector)
    }

    async fn close(&self) -> Result<(), RenderError> {
        let mut state = self.lock();
        if state.closed {
            return Err(RenderError::PageClosed);
        }
        state.closed = true;
        state.snapshot = None;
        Ok(())
    }
}
