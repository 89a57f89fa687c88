//! Format-specific document views.
//!
//! Each reader parses its document once when constructed; the accessors are
//! pure reads over the cached model, so repeated calls return identical
//! results until a new document is loaded.

use crate::error::Result;
use crate::models::{DocumentKind, ImageRecord, TableRecord, UrlRecord};

mod docx;
mod opc;
mod pdf;
mod pptx;

pub use docx::DocxDocument;
pub use pdf::PdfDocument;
pub use pptx::PptxDocument;

/// Capability set over a loaded document: walk its pages, slides or
/// paragraphs and surface text, hyperlinks, pictures and tables as records.
pub trait DocumentReader: Send + Sync {
    fn kind(&self) -> DocumentKind;

    /// All textual runs in document order.
    fn text(&self) -> Result<String>;

    /// One record per hyperlink run, with a 1-based page/slide index.
    fn urls(&self) -> Result<Vec<UrlRecord>>;

    /// Raw bytes of every embedded picture.
    fn images(&self) -> Result<Vec<ImageRecord>>;

    /// Row-major cell text of every table-shaped element.
    fn tables(&self) -> Result<Vec<TableRecord>>;
}
