//! Per-format file loaders and the extension-based registry.
//!
//! A loader only checks the path's extension and opens the file through the
//! format's parsing backend. Existence and corruption are not validated here;
//! parser failures propagate unchanged.

use std::path::Path;

use crate::error::{DocsiftError, Result};
use crate::readers::DocumentReader;

mod docx;
mod pdf;
mod ppt;

pub use docx::DocxLoader;
pub use pdf::PdfLoader;
pub use ppt::PptLoader;

pub trait FileLoader: Send + Sync {
    /// Lower-cased extensions this loader accepts, without the dot.
    fn accepted_extensions(&self) -> &'static [&'static str];

    /// Format name used in `InvalidFormat` messages.
    fn format_name(&self) -> &'static str;

    /// Open an already-validated path through the format's parser.
    fn open(&self, path: &Path) -> Result<Box<dyn DocumentReader>>;

    fn validate_path(&self, path: &Path) -> bool {
        match normalized_extension(path) {
            Some(ext) => self.accepted_extensions().contains(&ext.as_str()),
            None => false,
        }
    }

    fn load_file(&self, path: &Path) -> Result<Box<dyn DocumentReader>> {
        if !self.validate_path(path) {
            return Err(DocsiftError::InvalidFormat {
                expected: self.format_name(),
            });
        }
        self.open(path)
    }
}

/// Pick a loader for `path` by its normalized extension.
pub fn loader_for(path: &Path) -> Option<Box<dyn FileLoader>> {
    match normalized_extension(path)?.as_str() {
        "pdf" => Some(Box::new(PdfLoader)),
        "docx" => Some(Box::new(DocxLoader)),
        "ppt" | "pptx" => Some(Box::new(PptLoader)),
        _ => None,
    }
}

pub fn normalized_extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
}
