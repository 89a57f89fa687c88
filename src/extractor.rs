//! The extractor wires a loader to the extraction accessors.
//!
//! Each instance is single-owner and not thread safe: it holds one cached
//! document handle, replaced wholesale by every `load` call.

use std::path::Path;

use crate::error::{DocsiftError, Result};
use crate::loaders::FileLoader;
use crate::models::{DocumentKind, ImageRecord, TableRecord, UrlRecord};
use crate::readers::DocumentReader;

pub struct Extractor {
    loader: Box<dyn FileLoader>,
    handle: Option<Box<dyn DocumentReader>>,
}

impl Extractor {
    pub fn new(loader: Box<dyn FileLoader>) -> Self {
        Self {
            loader,
            handle: None,
        }
    }

    /// Load `path` through the injected loader, replacing any previously
    /// cached document.
    pub fn load(&mut self, path: &Path) -> Result<()> {
        let handle = self.loader.load_file(path)?;
        self.handle = Some(handle);
        Ok(())
    }

    pub fn kind(&self) -> Result<DocumentKind> {
        Ok(self.reader()?.kind())
    }

    pub fn extract_text(&self) -> Result<String> {
        self.reader()?.text()
    }

    pub fn extract_urls(&self) -> Result<Vec<UrlRecord>> {
        self.reader()?.urls()
    }

    pub fn extract_images(&self) -> Result<Vec<ImageRecord>> {
        self.reader()?.images()
    }

    pub fn extract_tables(&self) -> Result<Vec<TableRecord>> {
        self.reader()?.tables()
    }

    fn reader(&self) -> Result<&dyn DocumentReader> {
        self.handle.as_deref().ok_or(DocsiftError::NotLoaded)
    }
}
