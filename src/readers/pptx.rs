//! PPTX reader using zip + quick-xml.
//!
//! The whole deck is parsed once at load: slide order comes from
//! `ppt/presentation.xml`, each slide part is walked into a slide model
//! (shape paragraph lines, hyperlink runs, picture parts, tables), and the
//! accessors assemble records from that model.

use std::io::Cursor;

use quick_xml::events::Event;
use quick_xml::Reader;
use zip::ZipArchive;

use crate::error::{DocsiftError, Result};
use crate::models::{DocumentKind, ImageRecord, TableRecord, UrlRecord};
use crate::readers::{opc, DocumentReader};

pub struct PptxDocument {
    slides: Vec<SlideModel>,
}

#[derive(Default)]
struct SlideModel {
    /// Shape paragraph lines in shape order.
    lines: Vec<String>,
    /// (linked text, url) per hyperlink run.
    links: Vec<(String, String)>,
    /// (bytes, extension) per picture.
    images: Vec<(Vec<u8>, String)>,
    tables: Vec<Vec<Vec<String>>>,
}

impl PptxDocument {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut archive = ZipArchive::new(Cursor::new(bytes))
            .map_err(|e| DocsiftError::Parse(format!("PPTX parse error: {e}")))?;

        let slide_order = slide_order(&mut archive)?;
        let slide_parts = slide_parts(&mut archive)?;

        let mut slides = Vec::with_capacity(slide_order.len());
        for (index, r_id) in slide_order.iter().enumerate() {
            let slide_path = match slide_parts.iter().find(|(id, _)| id == r_id) {
                Some((_, path)) => path.clone(),
                None => format!("ppt/slides/slide{}.xml", index + 1),
            };

            let xml = match opc::read_part_string(&mut archive, &slide_path) {
                Ok(content) => content,
                Err(_) => {
                    slides.push(SlideModel::default());
                    continue;
                }
            };

            let parsed = parse_slide(&xml);
            slides.push(resolve_slide(&mut archive, &slide_path, parsed)?);
        }

        Ok(Self { slides })
    }
}

impl DocumentReader for PptxDocument {
    fn kind(&self) -> DocumentKind {
        DocumentKind::Pptx
    }

    fn text(&self) -> Result<String> {
        let mut text = String::new();
        for slide in &self.slides {
            for line in &slide.lines {
                text.push_str(line);
                text.push('\n');
            }
        }
        Ok(text)
    }

    fn urls(&self) -> Result<Vec<UrlRecord>> {
        let mut records = Vec::new();
        for (index, slide) in self.slides.iter().enumerate() {
            for (linked_text, url) in &slide.links {
                let linked_text = if linked_text.trim().is_empty() {
                    url.clone()
                } else {
                    linked_text.clone()
                };
                records.push(UrlRecord {
                    linked_text,
                    url: url.clone(),
                    page_number: index + 1,
                });
            }
        }
        Ok(records)
    }

    fn images(&self) -> Result<Vec<ImageRecord>> {
        let mut records = Vec::new();
        for (index, slide) in self.slides.iter().enumerate() {
            for (data, ext) in &slide.images {
                records.push(ImageRecord {
                    data: data.clone(),
                    ext: ext.clone(),
                    page_number: index + 1,
                    dimensions: None,
                });
            }
        }
        Ok(records)
    }

    fn tables(&self) -> Result<Vec<TableRecord>> {
        let mut records = Vec::new();
        for slide in &self.slides {
            for rows in &slide.tables {
                records.push(TableRecord { rows: rows.clone() });
            }
        }
        Ok(records)
    }
}

/// r:id list from `p:sldId` elements, in presentation order.
fn slide_order(archive: &mut ZipArchive<Cursor<&[u8]>>) -> Result<Vec<String>> {
    let xml = opc::read_part_string(archive, "ppt/presentation.xml")?;

    let mut reader = Reader::from_str(&xml);
    reader.config_mut().trim_text(true);

    let mut slide_ids = Vec::new();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Empty(e)) | Ok(Event::Start(e)) => {
                if e.name().as_ref() == b"p:sldId" {
                    for attr in e.attributes().flatten() {
                        if attr.key.as_ref() == b"r:id" {
                            if let Ok(val) = std::str::from_utf8(&attr.value) {
                                slide_ids.push(val.to_string());
                            }
                        }
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(DocsiftError::Parse(format!(
                    "error parsing presentation.xml: {e}"
                )))
            }
            _ => {}
        }
        buf.clear();
    }

    Ok(slide_ids)
}

/// rId -> slide part path from the presentation relationships.
fn slide_parts(archive: &mut ZipArchive<Cursor<&[u8]>>) -> Result<Vec<(String, String)>> {
    let xml = match opc::read_part_string(archive, "ppt/_rels/presentation.xml.rels") {
        Ok(content) => content,
        Err(_) => return Ok(Vec::new()),
    };

    Ok(opc::parse_relationships(&xml)
        .into_iter()
        .filter(|(_, rel)| {
            rel.rel_type.ends_with("/slide") && !rel.rel_type.contains("slideLayout")
        })
        .map(|(id, rel)| (id, opc::resolve_target("ppt", &rel.target)))
        .collect())
}

/// Raw per-slide parse output with unresolved relationship ids.
#[derive(Default)]
struct ParsedSlide {
    lines: Vec<String>,
    /// (linked text, rId) per `a:hlinkClick` run.
    link_rids: Vec<(String, String)>,
    /// rId per `a:blip` embed.
    image_rids: Vec<String>,
    tables: Vec<Vec<Vec<String>>>,
}

fn parse_slide(xml: &str) -> ParsedSlide {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut slide = ParsedSlide::default();
    let mut buf = Vec::new();

    let mut in_text = false;
    let mut in_table = false;
    let mut current_line = String::new();
    let mut run_text = String::new();
    let mut run_rid: Option<String> = None;
    let mut current_cell = String::new();
    let mut current_row: Vec<String> = Vec::new();
    let mut current_table: Vec<Vec<String>> = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"a:t" => in_text = true,
                b"a:tbl" => {
                    in_table = true;
                    current_table.clear();
                }
                b"a:tr" => current_row.clear(),
                b"a:tc" => current_cell.clear(),
                b"a:r" => {
                    run_text.clear();
                    run_rid = None;
                }
                b"a:hlinkClick" => run_rid = link_rid(&e),
                b"a:blip" => {
                    if let Some(rid) = embed_rid(&e) {
                        slide.image_rids.push(rid);
                    }
                }
                _ => {}
            },
            Ok(Event::Empty(e)) => match e.name().as_ref() {
                b"a:hlinkClick" => run_rid = link_rid(&e),
                b"a:blip" => {
                    if let Some(rid) = embed_rid(&e) {
                        slide.image_rids.push(rid);
                    }
                }
                _ => {}
            },
            Ok(Event::Text(e)) => {
                if in_text {
                    if let Ok(text) = std::str::from_utf8(e.as_ref()) {
                        let unescaped = opc::unescape_xml(text);
                        run_text.push_str(&unescaped);
                        if in_table {
                            current_cell.push_str(&unescaped);
                        } else {
                            current_line.push_str(&unescaped);
                        }
                    }
                }
            }
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"a:t" => in_text = false,
                b"a:r" => {
                    if let Some(rid) = run_rid.take() {
                        slide.link_rids.push((run_text.clone(), rid));
                    }
                }
                b"a:p" => {
                    if in_table {
                        if !current_cell.is_empty() && !current_cell.ends_with(' ') {
                            current_cell.push(' ');
                        }
                    } else {
                        let line = current_line.trim().to_string();
                        if !line.is_empty() {
                            slide.lines.push(line);
                        }
                        current_line.clear();
                    }
                }
                b"a:tc" => current_row.push(current_cell.trim().to_string()),
                b"a:tr" => current_table.push(std::mem::take(&mut current_row)),
                b"a:tbl" => {
                    in_table = false;
                    slide.tables.push(std::mem::take(&mut current_table));
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(_) => break,
            _ => {}
        }
        buf.clear();
    }

    slide
}

/// Resolve a parsed slide's relationship ids through its `.rels` part.
fn resolve_slide(
    archive: &mut ZipArchive<Cursor<&[u8]>>,
    slide_path: &str,
    parsed: ParsedSlide,
) -> Result<SlideModel> {
    let (dir, file) = match slide_path.rsplit_once('/') {
        Some((dir, file)) => (dir, file),
        None => ("", slide_path),
    };
    let rels_path = format!("{dir}/_rels/{file}.rels");
    let rels = match opc::read_part_string(archive, &rels_path) {
        Ok(xml) => opc::parse_relationships(&xml),
        Err(_) => Default::default(),
    };

    let mut slide = SlideModel {
        lines: parsed.lines,
        tables: parsed.tables,
        ..Default::default()
    };

    for (text, rid) in parsed.link_rids {
        let Some(rel) = rels.get(&rid) else { continue };
        if rel.external {
            slide.links.push((text, rel.target.clone()));
        }
    }

    for rid in parsed.image_rids {
        let Some(rel) = rels.get(&rid) else { continue };
        let part = opc::resolve_target(dir, &rel.target);
        let Ok(bytes) = opc::read_part_bytes(archive, &part) else {
            continue;
        };
        slide.images.push((bytes, opc::part_extension(&part)));
    }

    Ok(slide)
}

fn link_rid(e: &quick_xml::events::BytesStart<'_>) -> Option<String> {
    for attr in e.attributes().flatten() {
        if attr.key.as_ref() == b"r:id" {
            return std::str::from_utf8(&attr.value).ok().map(String::from);
        }
    }
    None
}

fn embed_rid(e: &quick_xml::events::BytesStart<'_>) -> Option<String> {
    for attr in e.attributes().flatten() {
        if attr.key.as_ref() == b"r:embed" {
            return std::str::from_utf8(&attr.value).ok().map(String::from);
        }
    }
    None
}
