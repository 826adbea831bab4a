use crate::error::{CoreError, CoreResult};
use crate::export::write_atomic;
use rust_xlsxwriter::{Format, Workbook};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

pub const SHEET_NAME: &str = "User Stories";
pub const HEADER: [&str; 4] = ["Summary", "Description", "Type", "Priority"];

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct UserStoryRow {
    pub summary: String,
    pub description: String,
    pub issue_type: String,
    pub priority: String,
}

impl UserStoryRow {
    fn cells(&self) -> [&str; 4] {
        [
            self.summary.as_str(),
            self.description.as_str(),
            self.issue_type.as_str(),
            self.priority.as_str(),
        ]
    }
}

pub fn user_story_rows(functional: &[String]) -> Vec<UserStoryRow> {
    functional
        .iter()
        .enumerate()
        .map(|(i, req)| UserStoryRow {
            summary: format!("User Story {}", i + 1),
            description: format!(
                "As a user, I want {} so that I can achieve the desired functionality.",
                req.to_lowercase()
            ),
            issue_type: "Story".to_string(),
            priority: "Medium".to_string(),
        })
        .collect()
}

pub fn render_user_stories_csv(rows: &[UserStoryRow]) -> CoreResult<String> {
    let mut wtr = csv::WriterBuilder::new().from_writer(vec![]);
    wtr.write_record(HEADER)?;
    for row in rows {
        wtr.write_record(row.cells())?;
    }
    let bytes = wtr.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

pub fn render_user_stories_xlsx(rows: &[UserStoryRow]) -> CoreResult<Vec<u8>> {
    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();
    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;
    for (col, title) in HEADER.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *title, &bold)?;
    }
    for (i, row) in rows.iter().enumerate() {
        let r = (i + 1) as u32;
        for (col, value) in row.cells().iter().enumerate() {
            sheet.write_string(r, col as u16, *value)?;
        }
    }
    Ok(workbook.save_to_buffer()?)
}

/// Format is chosen by the extension of `path`: `.xlsx` or `.csv`.
pub fn render_user_stories(functional: &[String], path: &Path) -> CoreResult<PathBuf> {
    let rows = user_story_rows(functional);
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    let bytes = match ext.as_deref() {
        Some("xlsx") => render_user_stories_xlsx(&rows)?,
        Some("csv") => render_user_stories_csv(&rows)?.into_bytes(),
        _ => {
            return Err(CoreError::InvalidInput(format!(
                "user stories must be written to a .xlsx or .csv path, got {}",
                path.display()
            )))
        }
    };
    write_atomic(path, &bytes)?;
    info!(path = %path.display(), stories = rows.len(), "user stories written");
    Ok(path.to_path_buf())
}
