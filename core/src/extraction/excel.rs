use crate::determinism::zip::read_package_entry;
use crate::error::{CoreError, CoreResult};
use calamine::{Data, Reader, Xlsx};
use quick_xml::events::Event;
use std::io::Cursor;

/// Every non-empty cell of the active sheet in row-major order, joined by a
/// space.
pub fn extract_excel_text(bytes: &[u8]) -> CoreResult<String> {
    let active = active_sheet_index(bytes);
    let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes))
        .map_err(|e| CoreError::Extraction(format!("unreadable workbook: {}", e)))?;
    let range = workbook
        .worksheet_range_at(active)
        .ok_or_else(|| CoreError::Extraction("workbook has no sheets".to_string()))?
        .map_err(|e| CoreError::Extraction(format!("unreadable sheet: {}", e)))?;

    let mut parts = Vec::new();
    for row in range.rows() {
        for cell in row {
            match cell {
                Data::Empty => {}
                Data::String(s) if s.is_empty() => {}
                other => parts.push(other.to_string()),
            }
        }
    }
    Ok(parts.join(" "))
}

/// `activeTab` of the first workbook view; 0 when absent or unreadable.
fn active_sheet_index(bytes: &[u8]) -> usize {
    let Ok(xml) = read_package_entry(bytes, "xl/workbook.xml") else {
        return 0;
    };
    let mut reader = quick_xml::Reader::from_str(&xml);
    loop {
        match reader.read_event() {
            Ok(Event::Empty(e)) | Ok(Event::Start(e)) if e.name().as_ref() == b"workbookView" => {
                return e
                    .attributes()
                    .flatten()
                    .find(|a| a.key.as_ref() == b"activeTab")
                    .and_then(|a| std::str::from_utf8(&a.value).ok()?.parse().ok())
                    .unwrap_or(0);
            }
            Ok(Event::Eof) | Err(_) => return 0,
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn workbook(sheets: &[&[&[&str]]], active: u16) -> Vec<u8> {
        let mut wb = rust_xlsxwriter::Workbook::new();
        for rows in sheets {
            let ws = wb.add_worksheet();
            for (r, row) in rows.iter().enumerate() {
                for (c, v) in row.iter().enumerate() {
                    if !v.is_empty() {
                        ws.write_string(r as u32, c as u16, *v).unwrap();
                    }
                }
            }
        }
        if let Ok(ws) = wb.worksheet_from_index(active as usize) {
            ws.set_active(true);
        }
        wb.save_to_buffer().unwrap()
    }

    #[test]
    fn cells_in_row_major_order_skipping_empty() {
        let bytes = workbook(&[&[&["Login", "", "Must"], &["", "Reports"]]], 0);
        assert_eq!(extract_excel_text(&bytes).unwrap(), "Login Must Reports");
    }

    #[test]
    fn reads_the_active_sheet() {
        let bytes = workbook(&[&[&["first"]], &[&["second"]]], 1);
        assert_eq!(extract_excel_text(&bytes).unwrap(), "second");
    }

    #[test]
    fn numbers_are_stringified() {
        let mut wb = rust_xlsxwriter::Workbook::new();
        let ws = wb.add_worksheet();
        ws.write_string(0, 0, "Limit").unwrap();
        ws.write_number(0, 1, 250).unwrap();
        let bytes = wb.save_to_buffer().unwrap();
        assert_eq!(extract_excel_text(&bytes).unwrap(), "Limit 250");
    }

    #[test]
    fn garbage_is_an_extraction_error() {
        assert!(matches!(
            extract_excel_text(b"no workbook here"),
            Err(CoreError::Extraction(_))
        ));
    }
}
