//! Andamio: Test-Support Toolkit for Browser Automation
//!
//! Andamio (Spanish: "scaffold") carries the helpers browser-automation
//! test suites lean on: injecting and re-navigating iframes on a live
//! page, dumping a page's frame tree as stable indented text, awaiting the
//! N-th occurrence of a named event, and asserting on the page geometry of
//! printed PDFs.
//!
//! Real browser control uses the Chrome `DevTools` Protocol via
//! chromiumoxide behind the `browser` feature; without it, a mock page
//! keeps the frame helpers unit-testable.
//!
//! # Example
//!
//! ```
//! use andamio::FrameTree;
//!
//! let tree = FrameTree::new("http://localhost:8907/main.html")
//!     .with_child(FrameTree::new("http://localhost:8907/child.html"));
//! assert_eq!(
//!     tree.dump(),
//!     "http://localhost:<PORT>/main.html\n    http://localhost:<PORT>/child.html"
//! );
//! ```

#![warn(missing_docs)]
// Lints are configured in workspace Cargo.toml [workspace.lints.clippy]

/// Browser and page control, frame injection helpers
#[allow(
    clippy::missing_errors_doc,
    clippy::must_use_candidate,
    clippy::missing_const_for_fn
)]
pub mod browser;

/// Named-event emitter and counting waits
#[allow(clippy::missing_errors_doc, clippy::must_use_candidate)]
pub mod emitter;

/// Frame tree model and indented dumps
pub mod frame;

/// PDF page geometry extraction
#[allow(clippy::missing_errors_doc, clippy::cast_precision_loss)]
pub mod pdf;

mod result;

/// Unit conversions (CSS pixels, PDF points, inches)
pub mod units;

/// Wait options and polling helpers
#[allow(clippy::missing_errors_doc, clippy::must_use_candidate)]
pub mod wait;

pub use browser::{Browser, BrowserConfig, Page};
pub use emitter::{wait_for_event, wait_for_events, EventEmitter, EventPayload, ListenerId};
pub use frame::{FrameTree, INDENT_PER_LEVEL, PORT_PLACEHOLDER};
pub use pdf::{pages as pdf_pages, PdfPage};
pub use result::{AndamioError, AndamioResult};
pub use units::{
    css_pixels_to_inches, inches_to_css_pixels, points_to_inches, CSS_PIXELS_PER_INCH,
    POINTS_PER_INCH,
};
pub use wait::{
    wait_until, WaitOptions, DEFAULT_POLL_INTERVAL_MS, DEFAULT_WAIT_TIMEOUT_MS,
};
