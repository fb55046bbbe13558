//! PDF page geometry extraction.
//!
//! Tests that print a page to PDF assert on the produced page sizes. This
//! module parses a PDF buffer and reports each page's width and height in
//! inches, in page order.

use crate::result::{AndamioError, AndamioResult};
use crate::units::points_to_inches;
use lopdf::{Dictionary, Document, Object};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// US Letter MediaBox, the fallback when a document carries none
const LETTER_MEDIA_BOX: [f64; 4] = [0.0, 0.0, 612.0, 792.0];

/// How many Parent links to follow when a page inherits its MediaBox
const MAX_PARENT_DEPTH: usize = 32;

/// Size of a single PDF page, in inches
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PdfPage {
    /// Page width in inches
    pub width: f64,
    /// Page height in inches
    pub height: f64,
}

/// Parse a PDF buffer and return each page's size in inches.
///
/// Page sizes come from the page's MediaBox, inherited from ancestor Pages
/// nodes when the page dictionary omits it. PDF points convert at 72 per
/// inch.
///
/// # Errors
///
/// Returns [`AndamioError::PdfError`] if the buffer is not a parseable PDF
pub fn pages(buffer: &[u8]) -> AndamioResult<Vec<PdfPage>> {
    let doc = Document::load_mem(buffer).map_err(|e| AndamioError::PdfError {
        message: e.to_string(),
    })?;

    let page_map = doc.get_pages();
    debug!(page_count = page_map.len(), "parsed pdf buffer");

    let mut pages = Vec::with_capacity(page_map.len());
    for (page_num, page_id) in page_map {
        let page_dict = doc
            .get_object(page_id)
            .and_then(Object::as_dict)
            .map_err(|e| AndamioError::PdfError {
                message: format!("page {page_num}: {e}"),
            })?;

        let media_box = media_box(&doc, page_dict);
        pages.push(PdfPage {
            width: points_to_inches(media_box[2] - media_box[0]),
            height: points_to_inches(media_box[3] - media_box[1]),
        });
    }

    Ok(pages)
}

/// Resolve a page's MediaBox, walking up the Pages tree for inherited
/// values and falling back to US Letter
fn media_box(doc: &Document, page_dict: &Dictionary) -> [f64; 4] {
    let mut dict = page_dict.clone();
    for _ in 0..MAX_PARENT_DEPTH {
        if let Ok(array) = dict.get(b"MediaBox").and_then(Object::as_array) {
            if let Some(parsed) = parse_box_array(array) {
                return parsed;
            }
        }

        let parent = dict
            .get(b"Parent")
            .and_then(Object::as_reference)
            .ok()
            .and_then(|id| doc.get_object(id).ok())
            .and_then(|obj| obj.as_dict().ok());
        match parent {
            Some(parent_dict) => dict = parent_dict.clone(),
            None => break,
        }
    }
    LETTER_MEDIA_BOX
}

/// Parse a box array `[x1, y1, x2, y2]`; `None` if it is not 4 numbers
fn parse_box_array(array: &[Object]) -> Option<[f64; 4]> {
    if array.len() != 4 {
        return None;
    }

    let mut result = [0.0; 4];
    for (slot, obj) in result.iter_mut().zip(array) {
        *slot = match obj {
            Object::Integer(n) => *n as f64,
            Object::Real(n) => f64::from(*n),
            _ => return None,
        };
    }
    Some(result)
}
