use crate::determinism::zip::read_package_entry;
use crate::error::{CoreError, CoreResult};
use quick_xml::events::Event;
use quick_xml::Reader;

const DOCUMENT_PART: &str = "word/document.xml";

/// Body paragraphs (empty ones included) joined by a space. Paragraphs inside
/// tables are not body paragraphs and are left out.
pub fn extract_docx_text(bytes: &[u8]) -> CoreResult<String> {
    let xml = read_package_entry(bytes, DOCUMENT_PART).map_err(|e| match e {
        CoreError::Parse(m) => CoreError::Parse(m),
        other => CoreError::Extraction(format!("not a Word document: {}", other)),
    })?;
    Ok(body_paragraphs(&xml)?.join(" "))
}

pub fn body_paragraphs(document_xml: &str) -> CoreResult<Vec<String>> {
    let mut reader = Reader::from_str(document_xml);
    let mut paragraphs = Vec::new();
    let mut current = String::new();
    let mut in_paragraph = false;
    let mut in_text = false;
    let mut table_depth = 0usize;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| CoreError::Parse(format!("malformed {}: {}", DOCUMENT_PART, e)))?;
        match event {
            Event::Start(e) => match e.name().as_ref() {
                b"w:tbl" => table_depth += 1,
                b"w:p" if table_depth == 0 => {
                    in_paragraph = true;
                    current.clear();
                }
                b"w:t" if in_paragraph => in_text = true,
                _ => {}
            },
            Event::Empty(e) => match e.name().as_ref() {
                b"w:p" if table_depth == 0 => paragraphs.push(String::new()),
                b"w:tab" if in_paragraph => current.push('\t'),
                b"w:br" | b"w:cr" if in_paragraph => current.push('\n'),
                _ => {}
            },
            Event::Text(t) if in_text => {
                let text = t
                    .unescape()
                    .map_err(|e| CoreError::Parse(format!("bad text run: {}", e)))?;
                current.push_str(&text);
            }
            Event::End(e) => match e.name().as_ref() {
                b"w:tbl" => table_depth = table_depth.saturating_sub(1),
                b"w:p" if in_paragraph => {
                    paragraphs.push(std::mem::take(&mut current));
                    in_paragraph = false;
                }
                b"w:t" => in_text = false,
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(paragraphs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::determinism::zip::write_package_deterministic;

    fn wrap(body: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{}</w:body></w:document>"#,
            body
        )
    }

    #[test]
    fn paragraphs_in_order_with_empty_ones() {
        let xml = wrap(
            r#"<w:p><w:r><w:t>Users </w:t></w:r><w:r><w:t>must log in</w:t></w:r></w:p><w:p/><w:p><w:r><w:t>Fees &amp; limits</w:t></w:r></w:p>"#,
        );
        assert_eq!(
            body_paragraphs(&xml).unwrap(),
            vec!["Users must log in", "", "Fees & limits"]
        );
    }

    #[test]
    fn table_paragraphs_are_skipped() {
        let xml = wrap(
            r#"<w:p><w:r><w:t>Intro</w:t></w:r></w:p><w:tbl><w:tr><w:tc><w:p><w:r><w:t>cell</w:t></w:r></w:p></w:tc></w:tr></w:tbl><w:p><w:r><w:t>Outro</w:t></w:r></w:p>"#,
        );
        assert_eq!(body_paragraphs(&xml).unwrap(), vec!["Intro", "Outro"]);
    }

    #[test]
    fn tabs_and_breaks_are_kept() {
        let xml = wrap(r#"<w:p><w:r><w:t>a</w:t><w:tab/><w:t>b</w:t><w:br/><w:t>c</w:t></w:r></w:p>"#);
        assert_eq!(body_paragraphs(&xml).unwrap(), vec!["a\tb\nc"]);
    }

    #[test]
    fn whole_package_joins_with_spaces() {
        let xml = wrap(
            r#"<w:p><w:r><w:t>One</w:t></w:r></w:p><w:p></w:p><w:p><w:r><w:t>Two</w:t></w:r></w:p>"#,
        );
        let pkg =
            write_package_deterministic(&[(DOCUMENT_PART.to_string(), xml.into_bytes())]).unwrap();
        assert_eq!(extract_docx_text(&pkg).unwrap(), "One  Two");
    }

    #[test]
    fn non_zip_bytes_are_extraction_errors() {
        assert!(matches!(
            extract_docx_text(b"plain bytes"),
            Err(CoreError::Extraction(_))
        ));
    }
}
