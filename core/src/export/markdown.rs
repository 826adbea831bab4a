use crate::error::CoreResult;
use crate::export::document::{Block, DocumentRenderer, SrsDocument};

/// Plain-text rendering of the same section structure as the .docx output.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownRenderer;

impl DocumentRenderer for MarkdownRenderer {
    fn extension(&self) -> &'static str {
        "md"
    }

    fn render(&self, doc: &SrsDocument) -> CoreResult<Vec<u8>> {
        Ok(render_markdown(doc).into_bytes())
    }
}

pub fn render_markdown(doc: &SrsDocument) -> String {
    let mut out = vec![format!("# {}", doc.title), String::new()];
    let mut in_list = false;
    for block in &doc.blocks {
        if in_list && !matches!(block, Block::Bullet(_)) {
            out.push(String::new());
        }
        in_list = matches!(block, Block::Bullet(_));
        match block {
            Block::Heading { level, text } => {
                out.push(format!("{} {}", "#".repeat(*level as usize + 1), text));
                out.push(String::new());
            }
            Block::Paragraph(text) => {
                out.push(text.clone());
                out.push(String::new());
            }
            Block::Bullet(text) => out.push(format!("- {}", text)),
        }
    }
    if in_list {
        out.push(String::new());
    }
    out.join("\n")
}
