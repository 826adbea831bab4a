use crate::error::CoreResult;
use crate::export::write_atomic;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

pub const DOCUMENT_TITLE: &str = "Software Requirements Specification";
pub const DOCUMENT_FONT: &str = "Inter";
pub const BODY_POINT_SIZE: u32 = 11;
pub const TITLE_POINT_SIZE: u32 = 16;
pub const MARGIN_INCHES: u32 = 1;

const INTRODUCTION: &str = "This document outlines the requirements for the proposed system, generated by Dynamo: AI-Powered Requirement Writing. \
The system aims to address the needs of stakeholders by providing a comprehensive set of functional and non-functional requirements. \
The following sections detail the system's capabilities, ensuring alignment with industry standards and best practices.";

const PURPOSE: &str = "The purpose of this document is to define the requirements for a system that addresses the specified needs. \
It serves as a foundation for development, ensuring all stakeholders have a clear understanding of the system's functionality and constraints.";

const SCOPE: &str = "This system will provide a robust solution for managing financial transactions, ensuring security, performance, and compliance with industry standards. \
It includes features for user authentication, transaction processing, and real-time monitoring, among others.";

const ASSUMPTIONS: &str = "4.1 Assumptions:\n\
- The system will have access to a stable internet connection for real-time monitoring.\n\
- Users are expected to have basic technical knowledge to interact with the system.\n\n\
4.2 Constraints:\n\
- The system must comply with PCI-DSS standards for payment processing.\n\
- Development must be completed within a 6-month timeline.";

const SUMMARY: &str = "This SRS document provides a comprehensive overview of the system's requirements, ensuring clarity and alignment with stakeholder needs. \
It serves as a blueprint for development, testing, and deployment, facilitating a smooth project lifecycle.";

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub enum Block {
    Heading { level: u8, text: String },
    /// May contain `\n` line breaks.
    Paragraph(String),
    Bullet(String),
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SrsDocument {
    pub title: String,
    pub blocks: Vec<Block>,
    pub font: String,
    pub body_point_size: u32,
    pub title_point_size: u32,
    pub margin_inches: u32,
}

impl SrsDocument {
    pub fn bullets(&self) -> impl Iterator<Item = &str> {
        self.blocks.iter().filter_map(|b| match b {
            Block::Bullet(t) => Some(t.as_str()),
            _ => None,
        })
    }
}

fn heading(level: u8, text: &str) -> Block {
    Block::Heading {
        level,
        text: text.to_string(),
    }
}

/// Fixed section structure; every requirement is included verbatim and
/// numbered in input order.
pub fn build_srs_document(functional: &[String], non_functional: &[String]) -> SrsDocument {
    let mut blocks = vec![
        heading(1, "1. Introduction"),
        Block::Paragraph(INTRODUCTION.to_string()),
        heading(2, "1.1 Purpose"),
        Block::Paragraph(PURPOSE.to_string()),
        heading(2, "1.2 Scope"),
        Block::Paragraph(SCOPE.to_string()),
        heading(1, "2. Functional Requirements"),
    ];
    for (i, req) in functional.iter().enumerate() {
        blocks.push(Block::Bullet(format!("FR{}: {}", i + 1, req)));
    }
    blocks.push(heading(1, "3. Non-Functional Requirements"));
    for (i, req) in non_functional.iter().enumerate() {
        blocks.push(Block::Bullet(format!("NFR{}: {}", i + 1, req)));
    }
    blocks.push(heading(1, "4. Assumptions and Constraints"));
    blocks.push(Block::Paragraph(ASSUMPTIONS.to_string()));
    blocks.push(heading(1, "5. Summary"));
    blocks.push(Block::Paragraph(SUMMARY.to_string()));

    SrsDocument {
        title: DOCUMENT_TITLE.to_string(),
        blocks,
        font: DOCUMENT_FONT.to_string(),
        body_point_size: BODY_POINT_SIZE,
        title_point_size: TITLE_POINT_SIZE,
        margin_inches: MARGIN_INCHES,
    }
}

pub trait DocumentRenderer {
    /// File extension of the rendered output, without the dot.
    fn extension(&self) -> &'static str;
    fn render(&self, doc: &SrsDocument) -> CoreResult<Vec<u8>>;
}

pub fn render_document(
    functional: &[String],
    non_functional: &[String],
    path: &Path,
    renderer: &dyn DocumentRenderer,
) -> CoreResult<PathBuf> {
    let doc = build_srs_document(functional, non_functional);
    let bytes = renderer.render(&doc)?;
    write_atomic(path, &bytes)?;
    info!(
        path = %path.display(),
        functional = functional.len(),
        non_functional = non_functional.len(),
        "requirements document written"
    );
    Ok(path.to_path_buf())
}
