//! Office Open XML (.docx) rendering of an [`SrsDocument`].

use crate::determinism::zip::write_package_deterministic;
use crate::error::CoreResult;
use crate::export::document::{Block, DocumentRenderer, SrsDocument};
use quick_xml::escape::escape;

const W_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
const TWIPS_PER_INCH: u32 = 1440;

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/><Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/><Override PartName="/word/numbering.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.numbering+xml"/></Types>"#;

const PACKAGE_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/></Relationships>"#;

const DOCUMENT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/numbering" Target="numbering.xml"/></Relationships>"#;

// Bullet list: abstract numbering 0, instance numId 1.
const NUMBERING: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:numbering xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:abstractNum w:abstractNumId="0"><w:lvl w:ilvl="0"><w:start w:val="1"/><w:numFmt w:val="bullet"/><w:lvlText w:val="•"/><w:lvlJc w:val="left"/><w:pPr><w:ind w:left="720" w:hanging="360"/></w:pPr></w:lvl></w:abstractNum><w:num w:numId="1"><w:abstractNumId w:val="0"/></w:num></w:numbering>"#;

#[derive(Debug, Clone, Copy, Default)]
pub struct DocxRenderer;

impl DocumentRenderer for DocxRenderer {
    fn extension(&self) -> &'static str {
        "docx"
    }

    fn render(&self, doc: &SrsDocument) -> CoreResult<Vec<u8>> {
        let entries = vec![
            ("[Content_Types].xml".to_string(), CONTENT_TYPES.as_bytes().to_vec()),
            ("_rels/.rels".to_string(), PACKAGE_RELS.as_bytes().to_vec()),
            ("word/_rels/document.xml.rels".to_string(), DOCUMENT_RELS.as_bytes().to_vec()),
            ("word/document.xml".to_string(), document_xml(doc).into_bytes()),
            ("word/numbering.xml".to_string(), NUMBERING.as_bytes().to_vec()),
            ("word/styles.xml".to_string(), styles_xml(doc).into_bytes()),
        ];
        write_package_deterministic(&entries)
    }
}

fn half_points(pt: u32) -> u32 {
    pt * 2
}

fn run(text: &str, font: &str, size_pt: Option<u32>) -> String {
    let size = size_pt
        .map(|pt| format!(r#"<w:sz w:val="{}"/>"#, half_points(pt)))
        .unwrap_or_default();
    let rpr = format!(
        r#"<w:rPr><w:rFonts w:ascii="{f}" w:hAnsi="{f}" w:cs="{f}"/>{size}</w:rPr>"#,
        f = escape(font),
        size = size
    );
    let mut out = format!("<w:r>{}", rpr);
    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            out.push_str("<w:br/>");
        }
        out.push_str(&format!(
            r#"<w:t xml:space="preserve">{}</w:t>"#,
            escape(line)
        ));
    }
    out.push_str("</w:r>");
    out
}

fn paragraph(ppr: &str, run_xml: &str) -> String {
    format!("<w:p><w:pPr>{}</w:pPr>{}</w:p>", ppr, run_xml)
}

pub fn document_xml(doc: &SrsDocument) -> String {
    let mut body = String::new();
    body.push_str(&paragraph(
        r#"<w:pStyle w:val="Title"/><w:jc w:val="center"/>"#,
        &run(&doc.title, &doc.font, Some(doc.title_point_size)),
    ));
    for block in &doc.blocks {
        let p = match block {
            Block::Heading { level, text } => paragraph(
                &format!(r#"<w:pStyle w:val="Heading{}"/>"#, level),
                &run(text, &doc.font, None),
            ),
            Block::Paragraph(text) => {
                paragraph("", &run(text, &doc.font, Some(doc.body_point_size)))
            }
            Block::Bullet(text) => paragraph(
                r#"<w:pStyle w:val="ListBullet"/><w:numPr><w:ilvl w:val="0"/><w:numId w:val="1"/></w:numPr>"#,
                &run(text, &doc.font, Some(doc.body_point_size)),
            ),
        };
        body.push_str(&p);
    }

    let margin = doc.margin_inches * TWIPS_PER_INCH;
    body.push_str(&format!(
        r#"<w:sectPr><w:pgSz w:w="12240" w:h="15840"/><w:pgMar w:top="{m}" w:right="{m}" w:bottom="{m}" w:left="{m}" w:header="720" w:footer="720" w:gutter="0"/></w:sectPr>"#,
        m = margin
    ));

    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="{}"><w:body>{}</w:body></w:document>"#,
        W_NS, body
    )
}

fn styles_xml(doc: &SrsDocument) -> String {
    let body = half_points(doc.body_point_size);
    let title = half_points(doc.title_point_size);
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:styles xmlns:w="{ns}"><w:docDefaults><w:rPrDefault><w:rPr><w:rFonts w:ascii="{f}" w:hAnsi="{f}" w:cs="{f}"/><w:sz w:val="{body}"/></w:rPr></w:rPrDefault></w:docDefaults><w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/></w:style><w:style w:type="paragraph" w:styleId="Title"><w:name w:val="Title"/><w:basedOn w:val="Normal"/><w:rPr><w:b/><w:sz w:val="{title}"/></w:rPr></w:style><w:style w:type="paragraph" w:styleId="Heading1"><w:name w:val="heading 1"/><w:basedOn w:val="Normal"/><w:pPr><w:spacing w:before="240" w:after="120"/><w:outlineLvl w:val="0"/></w:pPr><w:rPr><w:b/><w:sz w:val="28"/></w:rPr></w:style><w:style w:type="paragraph" w:styleId="Heading2"><w:name w:val="heading 2"/><w:basedOn w:val="Normal"/><w:pPr><w:spacing w:before="200" w:after="80"/><w:outlineLvl w:val="1"/></w:pPr><w:rPr><w:b/><w:sz w:val="26"/></w:rPr></w:style><w:style w:type="paragraph" w:styleId="ListBullet"><w:name w:val="List Bullet"/><w:basedOn w:val="Normal"/></w:style></w:styles>"#,
        ns = W_NS,
        f = escape(doc.font.as_str()),
        body = body,
        title = title
    )
}
