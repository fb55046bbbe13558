//! Frame tree rendering for multi-frame pages.
//!
//! A page's iframes form a tree rooted at the main frame. `FrameTree` is a
//! plain snapshot of that tree, renderable as indented text with each
//! frame's dev-server port masked so dumps stay stable across test runs.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Placeholder substituted for a masked port
pub const PORT_PLACEHOLDER: &str = ":<PORT>/";

/// Spaces added per nesting level in a dump
pub const INDENT_PER_LEVEL: usize = 4;

fn port_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r":\d{4}/").expect("valid port pattern"))
}

/// Snapshot of one frame and its children
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameTree {
    /// Frame document URL
    pub url: String,
    /// Child frames in document order
    pub children: Vec<FrameTree>,
}

impl FrameTree {
    /// Create a leaf frame
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            children: Vec::new(),
        }
    }

    /// Add a child frame
    #[must_use]
    pub fn with_child(mut self, child: Self) -> Self {
        self.children.push(child);
        self
    }

    /// Total number of frames in this tree, including self
    #[must_use]
    pub fn frame_count(&self) -> usize {
        1 + self.children.iter().map(Self::frame_count).sum::<usize>()
    }

    /// Render the tree as indented text.
    ///
    /// One line per frame, depth-first, each child indented
    /// [`INDENT_PER_LEVEL`] spaces more than its parent. The first 4-digit
    /// port in each URL is replaced with [`PORT_PLACEHOLDER`]; other digit
    /// counts pass through untouched. The output has no trailing newline.
    #[must_use]
    pub fn dump(&self) -> String {
        let mut out = String::new();
        self.dump_into(0, &mut out);
        out
    }

    fn dump_into(&self, depth: usize, out: &mut String) {
        if depth > 0 {
            out.push('\n');
        }
        for _ in 0..depth * INDENT_PER_LEVEL {
            out.push(' ');
        }
        out.push_str(&port_pattern().replace(&self.url, PORT_PLACEHOLDER));
        for child in &self.children {
            child.dump_into(depth + 1, out);
        }
    }
}

#[cfg(feature = "browser")]
impl FrameTree {
    pub(crate) fn from_cdp(tree: &chromiumoxide::cdp::browser_protocol::page::FrameTree) -> Self {
        Self {
            url: tree.frame.url.clone(),
            children: tree
                .child_frames
                .as_deref()
                .unwrap_or_default()
                .iter()
                .map(Self::from_cdp)
                .collect(),
        }
    }
}
