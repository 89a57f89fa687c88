//! DOCX reader using docx-rs for the document body plus direct package
//! access for hyperlink targets and embedded media.

use std::collections::HashMap;
use std::io::Cursor;

use zip::ZipArchive;

use crate::error::{DocsiftError, Result};
use crate::models::{DocumentKind, ImageRecord, TableRecord, UrlRecord};
use crate::readers::{opc, DocumentReader};

pub struct DocxDocument {
    docx: docx_rs::Docx,
    /// rId -> external target from `word/_rels/document.xml.rels`.
    hyperlink_rels: HashMap<String, String>,
    /// `word/media/*` parts, in package order.
    media: Vec<(String, Vec<u8>)>,
}

impl DocxDocument {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let docx = docx_rs::read_docx(bytes)
            .map_err(|e| DocsiftError::Parse(format!("DOCX parse error: {e}")))?;

        let mut archive = ZipArchive::new(Cursor::new(bytes))
            .map_err(|e| DocsiftError::Parse(format!("DOCX parse error: {e}")))?;

        let hyperlink_rels = match opc::read_part_string(&mut archive, "word/_rels/document.xml.rels")
        {
            Ok(xml) => opc::parse_relationships(&xml)
                .into_iter()
                .filter(|(_, rel)| rel.external && rel.rel_type.ends_with("/hyperlink"))
                .map(|(id, rel)| (id, rel.target))
                .collect(),
            Err(_) => HashMap::new(),
        };

        let media_names: Vec<String> = (0..archive.len())
            .filter_map(|i| archive.by_index(i).ok().map(|f| f.name().to_string()))
            .filter(|name| name.starts_with("word/media/") && !name.ends_with('/'))
            .collect();
        let mut media = Vec::with_capacity(media_names.len());
        for name in media_names {
            let bytes = opc::read_part_bytes(&mut archive, &name)?;
            media.push((name, bytes));
        }

        Ok(Self {
            docx,
            hyperlink_rels,
            media,
        })
    }

    fn paragraph_text(paragraph: &docx_rs::Paragraph) -> String {
        let mut content = String::new();
        for child in &paragraph.children {
            match child {
                docx_rs::ParagraphChild::Run(run) => content.push_str(&Self::run_text(run)),
                docx_rs::ParagraphChild::Hyperlink(link) => {
                    for link_child in &link.children {
                        if let docx_rs::ParagraphChild::Run(run) = link_child {
                            content.push_str(&Self::run_text(run));
                        }
                    }
                }
                _ => {}
            }
        }
        content
    }

    fn run_text(run: &docx_rs::Run) -> String {
        let mut content = String::new();
        for child in &run.children {
            if let docx_rs::RunChild::Text(text) = child {
                content.push_str(&text.text);
            }
        }
        content
    }

    fn table_rows(table: &docx_rs::Table) -> Vec<Vec<String>> {
        let mut rows = Vec::new();
        for table_child in &table.rows {
            let docx_rs::TableChild::TableRow(row) = table_child;
            let mut cells = Vec::new();
            for row_child in &row.cells {
                let docx_rs::TableRowChild::TableCell(cell) = row_child;
                let mut cell_text = String::new();
                for cell_child in &cell.children {
                    if let docx_rs::TableCellContent::Paragraph(paragraph) = cell_child {
                        let paragraph_text = Self::paragraph_text(paragraph);
                        if !cell_text.is_empty() {
                            cell_text.push(' ');
                        }
                        cell_text.push_str(&paragraph_text);
                    }
                }
                cells.push(cell_text.trim().to_string());
            }
            if !cells.is_empty() {
                rows.push(cells);
            }
        }
        rows
    }
}

impl DocumentReader for DocxDocument {
    fn kind(&self) -> DocumentKind {
        DocumentKind::Docx
    }

    fn text(&self) -> Result<String> {
        let mut text = String::new();
        for child in &self.docx.document.children {
            if let docx_rs::DocumentChild::Paragraph(paragraph) = child {
                let paragraph_text = Self::paragraph_text(paragraph);
                if paragraph_text.trim().is_empty() {
                    continue;
                }
                if !text.is_empty() {
                    text.push('\n');
                }
                text.push_str(&paragraph_text);
            }
        }
        Ok(text)
    }

    fn urls(&self) -> Result<Vec<UrlRecord>> {
        let mut records = Vec::new();
        let mut paragraph_index = 0usize;

        for child in &self.docx.document.children {
            let docx_rs::DocumentChild::Paragraph(paragraph) = child else {
                continue;
            };
            paragraph_index += 1;

            for paragraph_child in &paragraph.children {
                let docx_rs::ParagraphChild::Hyperlink(link) = paragraph_child else {
                    continue;
                };
                let docx_rs::HyperlinkData::External { rid, path } = &link.link else {
                    // Anchors point inside the document, not at a URL.
                    continue;
                };

                let url = match self.hyperlink_rels.get(rid) {
                    Some(target) => target.clone(),
                    None if !path.is_empty() => path.clone(),
                    None => continue,
                };

                let mut linked_text = String::new();
                for link_child in &link.children {
                    if let docx_rs::ParagraphChild::Run(run) = link_child {
                        linked_text.push_str(&Self::run_text(run));
                    }
                }
                if linked_text.trim().is_empty() {
                    linked_text = url.clone();
                }

                records.push(UrlRecord {
                    linked_text,
                    url,
                    page_number: paragraph_index,
                });
            }
        }

        Ok(records)
    }

    fn images(&self) -> Result<Vec<ImageRecord>> {
        // Word stores one flowing body; media parts carry no page position.
        Ok(self
            .media
            .iter()
            .map(|(name, bytes)| ImageRecord {
                data: bytes.clone(),
                ext: opc::part_extension(name),
                page_number: 1,
                dimensions: None,
            })
            .collect())
    }

    fn tables(&self) -> Result<Vec<TableRecord>> {
        let mut records = Vec::new();
        for child in &self.docx.document.children {
            if let docx_rs::DocumentChild::Table(table) = child {
                let rows = Self::table_rows(table);
                if !rows.is_empty() {
                    records.push(TableRecord { rows });
                }
            }
        }
        Ok(records)
    }
}
