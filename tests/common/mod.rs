#![allow(dead_code)]

use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

use zip::write::SimpleFileOptions;

use docsift::extractor::Extractor;
use docsift::loaders;

/// Write `bytes` under `name` in `dir` and load it through the registry.
pub fn extractor_for(dir: &Path, name: &str, bytes: &[u8]) -> Extractor {
    let path = write_document(dir, name, bytes);
    let loader = loaders::loader_for(&path).expect("no loader for test document");
    let mut extractor = Extractor::new(loader);
    extractor.load(&path).expect("failed to load test document");
    extractor
}

pub fn write_document(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, bytes).expect("failed to write test document");
    path
}

// ---------------------------------------------------------------------------
// PPTX fixtures
// ---------------------------------------------------------------------------

pub struct SlideContent {
    pub paragraphs: Vec<String>,
    /// (display text, url) rendered as a hyperlink run in its own shape.
    pub link: Option<(String, String)>,
    /// PNG bytes rendered as a picture shape.
    pub image: Option<Vec<u8>>,
    pub table: Option<Vec<Vec<String>>>,
}

impl SlideContent {
    pub fn new(paragraphs: &[&str]) -> Self {
        Self {
            paragraphs: paragraphs.iter().map(|s| s.to_string()).collect(),
            link: None,
            image: None,
            table: None,
        }
    }

    pub fn with_link(mut self, text: &str, url: &str) -> Self {
        self.link = Some((text.to_string(), url.to_string()));
        self
    }

    pub fn with_image(mut self, bytes: Vec<u8>) -> Self {
        self.image = Some(bytes);
        self
    }

    pub fn with_table(mut self, rows: Vec<Vec<&str>>) -> Self {
        self.table = Some(
            rows.into_iter()
                .map(|row| row.into_iter().map(|c| c.to_string()).collect())
                .collect(),
        );
        self
    }
}

pub fn build_pptx(slides: &[SlideContent]) -> Vec<u8> {
    let mut buffer = Cursor::new(Vec::new());
    {
        let mut zip = zip::ZipWriter::new(&mut buffer);
        let options = SimpleFileOptions::default()
            .compression_method(zip::CompressionMethod::Deflated)
            .unix_permissions(0o644);

        zip.start_file("[Content_Types].xml", options).unwrap();
        zip.write_all(generate_content_types(slides).as_bytes())
            .unwrap();

        zip.add_directory("_rels", options).unwrap();
        zip.start_file("_rels/.rels", options).unwrap();
        zip.write_all(ROOT_RELS.as_bytes()).unwrap();

        zip.add_directory("ppt", options).unwrap();
        zip.start_file("ppt/presentation.xml", options).unwrap();
        zip.write_all(generate_presentation_xml(slides).as_bytes())
            .unwrap();

        zip.add_directory("ppt/_rels", options).unwrap();
        zip.start_file("ppt/_rels/presentation.xml.rels", options)
            .unwrap();
        zip.write_all(generate_presentation_rels(slides).as_bytes())
            .unwrap();

        zip.add_directory("ppt/slides", options).unwrap();
        for (i, slide) in slides.iter().enumerate() {
            let filename = format!("ppt/slides/slide{}.xml", i + 1);
            zip.start_file(&filename, options).unwrap();
            zip.write_all(generate_slide_xml(slide).as_bytes()).unwrap();
        }

        let needs_rels = slides.iter().any(|s| s.link.is_some() || s.image.is_some());
        if needs_rels {
            zip.add_directory("ppt/slides/_rels", options).unwrap();
            for (i, slide) in slides.iter().enumerate() {
                if slide.link.is_none() && slide.image.is_none() {
                    continue;
                }
                let filename = format!("ppt/slides/_rels/slide{}.xml.rels", i + 1);
                zip.start_file(&filename, options).unwrap();
                zip.write_all(generate_slide_rels(slide, i + 1).as_bytes())
                    .unwrap();
            }
        }

        let has_images = slides.iter().any(|s| s.image.is_some());
        if has_images {
            zip.add_directory("ppt/media", options).unwrap();
            for (i, slide) in slides.iter().enumerate() {
                if let Some(image) = &slide.image {
                    zip.start_file(format!("ppt/media/image{}.png", i + 1), options)
                        .unwrap();
                    zip.write_all(image).unwrap();
                }
            }
        }

        zip.finish().unwrap();
    }
    buffer.into_inner()
}

const ROOT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
    <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="ppt/presentation.xml"/>
</Relationships>"#;

fn generate_content_types(slides: &[SlideContent]) -> String {
    let mut overrides = String::new();
    for (i, _) in slides.iter().enumerate() {
        overrides.push_str(&format!(
            r#"<Override PartName="/ppt/slides/slide{}.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slide+xml"/>"#,
            i + 1
        ));
    }

    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
<Default Extension="xml" ContentType="application/xml"/>
<Default Extension="png" ContentType="image/png"/>
<Override PartName="/ppt/presentation.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml"/>
{overrides}</Types>"#
    )
}

fn generate_presentation_xml(slides: &[SlideContent]) -> String {
    let mut slide_ids = String::new();
    for (i, _) in slides.iter().enumerate() {
        slide_ids.push_str(&format!(
            r#"<p:sldId id="{}" r:id="rId{}"/>"#,
            256 + i,
            i + 1
        ));
    }

    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:presentation xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main">
<p:sldIdLst>{slide_ids}</p:sldIdLst>
</p:presentation>"#
    )
}

fn generate_presentation_rels(slides: &[SlideContent]) -> String {
    let mut relationships = String::new();
    for (i, _) in slides.iter().enumerate() {
        relationships.push_str(&format!(
            r#"<Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide" Target="slides/slide{}.xml"/>"#,
            i + 1,
            i + 1
        ));
    }

    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
{relationships}</Relationships>"#
    )
}

fn generate_slide_xml(slide: &SlideContent) -> String {
    let mut shapes = String::new();
    let mut shape_id = 2;

    for paragraph in &slide.paragraphs {
        shapes.push_str(&format!(
            r#"<p:sp><p:nvSpPr><p:cNvPr id="{shape_id}" name="TextBox {shape_id}"/><p:cNvSpPr txBox="1"/><p:nvPr/></p:nvSpPr><p:spPr/><p:txBody><a:bodyPr/><a:p><a:r><a:t>{paragraph}</a:t></a:r></a:p></p:txBody></p:sp>"#
        ));
        shape_id += 1;
    }

    if let Some((text, _)) = &slide.link {
        shapes.push_str(&format!(
            r#"<p:sp><p:nvSpPr><p:cNvPr id="{shape_id}" name="Link {shape_id}"/><p:cNvSpPr txBox="1"/><p:nvPr/></p:nvSpPr><p:spPr/><p:txBody><a:bodyPr/><a:p><a:r><a:rPr lang="en-US"><a:hlinkClick r:id="rId90"/></a:rPr><a:t>{text}</a:t></a:r></a:p></p:txBody></p:sp>"#
        ));
        shape_id += 1;
    }

    if slide.image.is_some() {
        shapes.push_str(&format!(
            r#"<p:pic><p:nvPicPr><p:cNvPr id="{shape_id}" name="Picture {shape_id}"/><p:cNvPicPr/><p:nvPr/></p:nvPicPr><p:blipFill><a:blip r:embed="rId91"/><a:stretch><a:fillRect/></a:stretch></p:blipFill><p:spPr/></p:pic>"#
        ));
        shape_id += 1;
    }

    if let Some(rows) = &slide.table {
        let mut table_rows = String::new();
        for row in rows {
            let mut cells = String::new();
            for cell in row {
                cells.push_str(&format!(
                    r#"<a:tc><a:txBody><a:bodyPr/><a:p><a:r><a:t>{cell}</a:t></a:r></a:p></a:txBody><a:tcPr/></a:tc>"#
                ));
            }
            table_rows.push_str(&format!(r#"<a:tr h="370840">{cells}</a:tr>"#));
        }
        shapes.push_str(&format!(
            r#"<p:graphicFrame><p:nvGraphicFramePr><p:cNvPr id="{shape_id}" name="Table {shape_id}"/><p:cNvGraphicFramePr/><p:nvPr/></p:nvGraphicFramePr><a:graphic><a:graphicData uri="http://schemas.openxmlformats.org/drawingml/2006/table"><a:tbl><a:tblPr/><a:tblGrid/>{table_rows}</a:tbl></a:graphicData></a:graphic></p:graphicFrame>"#
        ));
    }

    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sld xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main">
<p:cSld><p:spTree>
<p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>
<p:grpSpPr/>
{shapes}</p:spTree></p:cSld>
</p:sld>"#
    )
}

fn generate_slide_rels(slide: &SlideContent, slide_num: usize) -> String {
    let mut relationships = String::new();
    if let Some((_, url)) = &slide.link {
        relationships.push_str(&format!(
            r#"<Relationship Id="rId90" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/hyperlink" Target="{url}" TargetMode="External"/>"#
        ));
    }
    if slide.image.is_some() {
        relationships.push_str(&format!(
            r#"<Relationship Id="rId91" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/image" Target="../media/image{slide_num}.png"/>"#
        ));
    }

    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
{relationships}</Relationships>"#
    )
}

/// Minimal PNG header bytes, enough to look like image content.
pub fn png_bytes() -> Vec<u8> {
    vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x01, 0x02, 0x03]
}

// ---------------------------------------------------------------------------
// DOCX fixtures
// ---------------------------------------------------------------------------

pub fn build_docx<F>(builder_fn: F) -> Vec<u8>
where
    F: FnOnce(docx_rs::Docx) -> docx_rs::Docx,
{
    let docx = builder_fn(docx_rs::Docx::new());
    let mut buffer = Cursor::new(Vec::new());
    docx.build().pack(&mut buffer).expect("Failed to pack DOCX");
    buffer.into_inner()
}

/// Re-pack a zip archive with one extra entry appended.
pub fn add_zip_entry(bytes: &[u8], name: &str, content: &[u8]) -> Vec<u8> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
    let mut buffer = Cursor::new(Vec::new());
    {
        let mut zip = zip::ZipWriter::new(&mut buffer);
        for i in 0..archive.len() {
            let entry = archive.by_index(i).unwrap();
            zip.raw_copy_file(entry).unwrap();
        }
        let options = SimpleFileOptions::default()
            .compression_method(zip::CompressionMethod::Deflated)
            .unix_permissions(0o644);
        zip.start_file(name, options).unwrap();
        zip.write_all(content).unwrap();
        zip.finish().unwrap();
    }
    buffer.into_inner()
}

// ---------------------------------------------------------------------------
// PDF fixtures
// ---------------------------------------------------------------------------

pub struct PdfContent {
    pub text: String,
    pub link: Option<String>,
    /// (jpeg bytes, width, height) embedded as a DCTDecode image XObject.
    pub image: Option<(Vec<u8>, i64, i64)>,
}

impl PdfContent {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            link: None,
            image: None,
        }
    }

    pub fn with_link(mut self, url: &str) -> Self {
        self.link = Some(url.to_string());
        self
    }

    pub fn with_image(mut self, bytes: Vec<u8>, width: i64, height: i64) -> Self {
        self.image = Some((bytes, width, height));
        self
    }
}

pub fn build_pdf(content: &PdfContent) -> Vec<u8> {
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Document, Object, Stream};

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });

    let mut resources = dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    };

    if let Some((bytes, width, height)) = &content.image {
        let image_id = doc.add_object(Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => *width,
                "Height" => *height,
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => 8,
                "Filter" => "DCTDecode",
            },
            bytes.clone(),
        ));
        resources.set("XObject", dictionary! { "Im1" => image_id });
    }
    let resources_id = doc.add_object(resources);

    let page_content = Content {
        operations: vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), 24.into()]),
            Operation::new("Td", vec![100.into(), 600.into()]),
            Operation::new("Tj", vec![Object::string_literal(content.text.as_str())]),
            Operation::new("ET", vec![]),
        ],
    };
    let content_id = doc.add_object(Stream::new(
        dictionary! {},
        page_content.encode().expect("failed to encode PDF content"),
    ));

    let mut page = dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
    };

    if let Some(url) = &content.link {
        let annot_id = doc.add_object(dictionary! {
            "Type" => "Annot",
            "Subtype" => "Link",
            "Rect" => vec![100.into(), 590.into(), 300.into(), 620.into()],
            "Border" => vec![0.into(), 0.into(), 0.into()],
            "A" => dictionary! {
                "Type" => "Action",
                "S" => "URI",
                "URI" => Object::string_literal(url.as_str()),
            },
        });
        page.set("Annots", vec![annot_id.into()]);
    }
    let page_id = doc.add_object(page);

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buffer = Cursor::new(Vec::new());
    doc.save_to(&mut buffer).expect("failed to save PDF");
    buffer.into_inner()
}

/// Bytes that open with a JPEG marker but decode to nothing useful.
pub fn jpeg_bytes() -> Vec<u8> {
    vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, 0x4A, 0x46, 0x49, 0x46]
}
