//! Browser control for headless testing.
//!
//! Real browser control via the Chrome `DevTools` Protocol. When compiled
//! with the `browser` feature, it uses chromiumoxide for full CDP support.
//! Without the feature, it provides a mock implementation that tracks an
//! in-memory iframe registry so the frame helpers stay unit-testable.

use crate::result::{AndamioError, AndamioResult};

/// Browser configuration
#[derive(Debug, Clone)]
pub struct BrowserConfig {
    /// Run in headless mode
    pub headless: bool,
    /// Viewport width
    pub viewport_width: u32,
    /// Viewport height
    pub viewport_height: u32,
    /// Path to chromium binary (None = auto-detect)
    pub chromium_path: Option<String>,
    /// Sandbox mode (disable for containers)
    pub sandbox: bool,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            viewport_width: 800,
            viewport_height: 600,
            chromium_path: None,
            sandbox: true,
        }
    }
}

impl BrowserConfig {
    /// Set viewport dimensions
    #[must_use]
    pub const fn with_viewport(mut self, width: u32, height: u32) -> Self {
        self.viewport_width = width;
        self.viewport_height = height;
        self
    }

    /// Set headless mode
    #[must_use]
    pub const fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Set chromium path
    #[must_use]
    pub fn with_chromium_path(mut self, path: impl Into<String>) -> Self {
        self.chromium_path = Some(path.into());
        self
    }

    /// Disable sandbox (for containers/CI)
    #[must_use]
    pub const fn with_no_sandbox(mut self) -> Self {
        self.sandbox = false;
        self
    }
}

/// JS expression that injects an iframe and settles once it has loaded
fn attach_frame_script(frame_id: &str, url: &str) -> AndamioResult<String> {
    let id_lit = serde_json::to_string(frame_id)?;
    let url_lit = serde_json::to_string(url)?;
    Ok(format!(
        "(() => {{ \
            const frame = document.createElement('iframe'); \
            frame.src = {url_lit}; \
            frame.id = {id_lit}; \
            document.body.appendChild(frame); \
            return new Promise(x => {{ frame.onload = () => x(true); }}); \
        }})()"
    ))
}

/// JS expression that removes an iframe; `false` means the id was missing
fn detach_frame_script(frame_id: &str) -> AndamioResult<String> {
    let id_lit = serde_json::to_string(frame_id)?;
    Ok(format!(
        "(() => {{ \
            const frame = document.getElementById({id_lit}); \
            if (!frame) return false; \
            frame.remove(); \
            return true; \
        }})()"
    ))
}

/// JS expression that re-navigates an iframe and settles on its load event
fn navigate_frame_script(frame_id: &str, url: &str) -> AndamioResult<String> {
    let id_lit = serde_json::to_string(frame_id)?;
    let url_lit = serde_json::to_string(url)?;
    Ok(format!(
        "(() => {{ \
            const frame = document.getElementById({id_lit}); \
            if (!frame) return false; \
            const loaded = new Promise(x => {{ frame.onload = () => x(true); }}); \
            frame.src = {url_lit}; \
            return loaded; \
        }})()"
    ))
}

// ============================================================================
// Real CDP Implementation (when `browser` feature is enabled)
// ============================================================================

#[cfg(feature = "browser")]
mod cdp {
    use super::{
        attach_frame_script, detach_frame_script, navigate_frame_script, AndamioError,
        AndamioResult, BrowserConfig,
    };
    use crate::frame::FrameTree;
    use chromiumoxide::browser::{Browser as CdpBrowser, BrowserConfig as CdpConfig};
    use chromiumoxide::cdp::browser_protocol::page::{GetFrameTreeParams, PrintToPdfParams};
    use chromiumoxide::cdp::js_protocol::runtime::EvaluateParams;
    use chromiumoxide::page::Page as CdpPage;
    use futures::StreamExt;
    use std::sync::Arc;
    use tokio::sync::Mutex;
    use tracing::debug;

    /// Browser instance with real CDP connection
    #[derive(Debug)]
    pub struct Browser {
        config: BrowserConfig,
        inner: Arc<Mutex<CdpBrowser>>,
        #[allow(dead_code)]
        handle: tokio::task::JoinHandle<()>,
    }

    impl Browser {
        /// Launch a new browser instance with real CDP
        ///
        /// # Errors
        ///
        /// Returns error if browser cannot be launched
        pub async fn launch(config: BrowserConfig) -> AndamioResult<Self> {
            let mut builder = CdpConfig::builder();

            if !config.headless {
                builder = builder.with_head();
            }

            if !config.sandbox {
                builder = builder.no_sandbox();
            }

            if let Some(ref path) = config.chromium_path {
                builder = builder.chrome_executable(path);
            }

            let cdp_config = builder
                .build()
                .map_err(|e| AndamioError::BrowserLaunchError { message: e })?;

            let (browser, mut handler) = CdpBrowser::launch(cdp_config).await.map_err(|e| {
                AndamioError::BrowserLaunchError {
                    message: e.to_string(),
                }
            })?;

            // Spawn handler task
            let handle = tokio::spawn(async move {
                while let Some(h) = handler.next().await {
                    if h.is_err() {
                        break;
                    }
                }
            });

            Ok(Self {
                config,
                inner: Arc::new(Mutex::new(browser)),
                handle,
            })
        }

        /// Create a new page
        ///
        /// # Errors
        ///
        /// Returns error if page cannot be created
        pub async fn new_page(&self) -> AndamioResult<Page> {
            let browser = self.inner.lock().await;
            let cdp_page =
                browser
                    .new_page("about:blank")
                    .await
                    .map_err(|e| AndamioError::PageError {
                        message: e.to_string(),
                    })?;

            Ok(Page {
                width: self.config.viewport_width,
                height: self.config.viewport_height,
                url: String::from("about:blank"),
                inner: Arc::new(Mutex::new(cdp_page)),
            })
        }

        /// Get the browser configuration
        #[must_use]
        pub const fn config(&self) -> &BrowserConfig {
            &self.config
        }

        /// Close the browser
        pub async fn close(self) -> AndamioResult<()> {
            let mut browser = self.inner.lock().await;
            browser
                .close()
                .await
                .map_err(|e| AndamioError::BrowserLaunchError {
                    message: e.to_string(),
                })?;
            Ok(())
        }
    }

    /// A browser page with real CDP connection
    #[derive(Debug)]
    pub struct Page {
        /// Page width
        pub width: u32,
        /// Page height
        pub height: u32,
        /// Current URL
        pub url: String,
        /// CDP page handle
        inner: Arc<Mutex<CdpPage>>,
    }

    impl Page {
        /// Navigate to a URL
        ///
        /// # Errors
        ///
        /// Returns error if navigation fails
        pub async fn goto(&mut self, url: &str) -> AndamioResult<()> {
            debug!(url, "navigating page");
            let page = self.inner.lock().await;
            page.goto(url)
                .await
                .map_err(|e| AndamioError::NavigationError {
                    url: url.to_string(),
                    message: e.to_string(),
                })?;
            drop(page);
            self.url = url.to_string();
            Ok(())
        }

        /// Evaluate a JavaScript expression, awaiting promises
        ///
        /// # Errors
        ///
        /// Returns error if evaluation fails
        pub async fn evaluate(&self, script: &str) -> AndamioResult<serde_json::Value> {
            let params = EvaluateParams::builder()
                .expression(script)
                .await_promise(true)
                .return_by_value(true)
                .build()
                .map_err(|e| AndamioError::EvaluationError { message: e })?;

            let page = self.inner.lock().await;
            let result =
                page.evaluate(params)
                    .await
                    .map_err(|e| AndamioError::EvaluationError {
                        message: e.to_string(),
                    })?;
            Ok(result.value().cloned().unwrap_or(serde_json::Value::Null))
        }

        /// Inject an `<iframe id=.. src=..>` into the document body and wait
        /// for its `load` event
        ///
        /// # Errors
        ///
        /// Returns error if the injection script fails
        pub async fn attach_frame(&self, frame_id: &str, url: &str) -> AndamioResult<()> {
            debug!(frame_id, url, "attaching frame");
            self.evaluate(&attach_frame_script(frame_id, url)?).await?;
            Ok(())
        }

        /// Remove the iframe with the given id from the document
        ///
        /// # Errors
        ///
        /// Returns [`AndamioError::FrameNotFound`] if no iframe has that id
        pub async fn detach_frame(&self, frame_id: &str) -> AndamioResult<()> {
            debug!(frame_id, "detaching frame");
            let removed = self.evaluate(&detach_frame_script(frame_id)?).await?;
            if removed == serde_json::Value::Bool(true) {
                Ok(())
            } else {
                Err(AndamioError::FrameNotFound {
                    frame_id: frame_id.to_string(),
                })
            }
        }

        /// Point an existing iframe at a new URL and wait for its `load`
        /// event
        ///
        /// # Errors
        ///
        /// Returns [`AndamioError::FrameNotFound`] if no iframe has that id
        pub async fn navigate_frame(&self, frame_id: &str, url: &str) -> AndamioResult<()> {
            debug!(frame_id, url, "navigating frame");
            let loaded = self.evaluate(&navigate_frame_script(frame_id, url)?).await?;
            if loaded == serde_json::Value::Bool(true) {
                Ok(())
            } else {
                Err(AndamioError::FrameNotFound {
                    frame_id: frame_id.to_string(),
                })
            }
        }

        /// Capture the live frame tree via CDP `Page.getFrameTree`
        ///
        /// # Errors
        ///
        /// Returns error if the CDP command fails
        pub async fn frame_tree(&self) -> AndamioResult<FrameTree> {
            let page = self.inner.lock().await;
            let response = page
                .execute(GetFrameTreeParams::default())
                .await
                .map_err(|e| AndamioError::PageError {
                    message: e.to_string(),
                })?;
            Ok(FrameTree::from_cdp(&response.frame_tree))
        }

        /// Render the page to a PDF byte buffer via CDP `Page.printToPDF`
        ///
        /// # Errors
        ///
        /// Returns error if printing fails or the payload is not valid
        /// base64
        pub async fn print_to_pdf(&self) -> AndamioResult<Vec<u8>> {
            let page = self.inner.lock().await;
            let response = page
                .execute(PrintToPdfParams::default())
                .await
                .map_err(|e| AndamioError::PageError {
                    message: e.to_string(),
                })?;

            use base64::Engine;
            base64::engine::general_purpose::STANDARD
                .decode(&response.data)
                .map_err(|e| AndamioError::PageError {
                    message: e.to_string(),
                })
        }

        /// Get current URL
        #[must_use]
        pub fn current_url(&self) -> &str {
            &self.url
        }
    }
}

// ============================================================================
// Mock Implementation (when `browser` feature is NOT enabled)
// ============================================================================

#[cfg(not(feature = "browser"))]
#[allow(clippy::missing_const_for_fn)]
mod mock {
    use super::{AndamioError, AndamioResult, BrowserConfig};
    use crate::frame::FrameTree;
    use tracing::debug;

    /// An iframe tracked by the mock page
    #[derive(Debug, Clone)]
    struct MockFrame {
        id: String,
        url: String,
    }

    /// Browser instance for testing (mock when `browser` feature disabled)
    #[derive(Debug)]
    pub struct Browser {
        config: BrowserConfig,
    }

    impl Browser {
        /// Launch a new browser instance (mock)
        ///
        /// # Errors
        ///
        /// Returns error if browser cannot be launched
        pub fn launch(config: BrowserConfig) -> AndamioResult<Self> {
            Ok(Self { config })
        }

        /// Create a new page
        ///
        /// # Errors
        ///
        /// Returns error if page cannot be created
        pub fn new_page(&self) -> AndamioResult<Page> {
            Ok(Page::new(
                self.config.viewport_width,
                self.config.viewport_height,
            ))
        }

        /// Get the browser configuration
        #[must_use]
        pub const fn config(&self) -> &BrowserConfig {
            &self.config
        }
    }

    /// A browser page for testing (mock when `browser` feature disabled)
    #[derive(Debug)]
    pub struct Page {
        /// Page width
        pub width: u32,
        /// Page height
        pub height: u32,
        /// Current URL
        pub url: String,
        /// Iframes injected into this page, in attach order
        frames: Vec<MockFrame>,
    }

    impl Page {
        /// Create a new page
        #[must_use]
        pub fn new(width: u32, height: u32) -> Self {
            Self {
                width,
                height,
                url: String::from("about:blank"),
                frames: Vec::new(),
            }
        }

        /// Navigate to a URL
        ///
        /// # Errors
        ///
        /// Returns error if navigation fails
        pub fn goto(&mut self, url: &str) -> AndamioResult<()> {
            self.url = url.to_string();
            Ok(())
        }

        /// Evaluate a JavaScript expression (mock returns error)
        ///
        /// # Errors
        ///
        /// Always returns error in mock mode
        pub fn evaluate(&self, _script: &str) -> AndamioResult<serde_json::Value> {
            Err(AndamioError::EvaluationError {
                message:
                    "Browser feature not enabled. Enable 'browser' feature for real CDP support."
                        .to_string(),
            })
        }

        /// Record an iframe with the given id and url.
        ///
        /// A duplicate id appends a second iframe, matching DOM
        /// `appendChild` semantics.
        ///
        /// # Errors
        ///
        /// Infallible in mock mode
        pub fn attach_frame(&mut self, frame_id: &str, url: &str) -> AndamioResult<()> {
            debug!(frame_id, url, "attaching frame (mock)");
            self.frames.push(MockFrame {
                id: frame_id.to_string(),
                url: url.to_string(),
            });
            Ok(())
        }

        /// Remove the first iframe with the given id
        ///
        /// # Errors
        ///
        /// Returns [`AndamioError::FrameNotFound`] if no iframe has that id
        pub fn detach_frame(&mut self, frame_id: &str) -> AndamioResult<()> {
            debug!(frame_id, "detaching frame (mock)");
            let position = self.frames.iter().position(|f| f.id == frame_id).ok_or(
                AndamioError::FrameNotFound {
                    frame_id: frame_id.to_string(),
                },
            )?;
            self.frames.remove(position);
            Ok(())
        }

        /// Point the first iframe with the given id at a new URL
        ///
        /// # Errors
        ///
        /// Returns [`AndamioError::FrameNotFound`] if no iframe has that id
        pub fn navigate_frame(&mut self, frame_id: &str, url: &str) -> AndamioResult<()> {
            debug!(frame_id, url, "navigating frame (mock)");
            let frame = self.frames.iter_mut().find(|f| f.id == frame_id).ok_or(
                AndamioError::FrameNotFound {
                    frame_id: frame_id.to_string(),
                },
            )?;
            frame.url = url.to_string();
            Ok(())
        }

        /// Snapshot the page's frame tree: the main frame with one child
        /// per injected iframe
        #[must_use]
        pub fn frame_tree(&self) -> FrameTree {
            FrameTree {
                url: self.url.clone(),
                children: self
                    .frames
                    .iter()
                    .map(|f| FrameTree::new(f.url.clone()))
                    .collect(),
            }
        }

        /// Number of iframes currently attached
        #[must_use]
        pub fn frame_count(&self) -> usize {
            self.frames.len()
        }

        /// Render the page to a PDF buffer (mock returns empty)
        ///
        /// # Errors
        ///
        /// Returns empty bytes in mock mode
        pub fn print_to_pdf(&self) -> AndamioResult<Vec<u8>> {
            Ok(vec![])
        }

        /// Get current URL
        #[must_use]
        pub fn current_url(&self) -> &str {
            &self.url
        }
    }
}

// Re-export based on feature
#[cfg(feature = "browser")]
pub use cdp::{Browser, Page};

#[cfg(not(feature = "browser"))]
pub use mock::{Browser, Page};
