use crate::error::{CoreError, CoreResult};
use std::io::{Cursor, Read, Write};
use zip::write::{SimpleFileOptions, ZipWriter};
use zip::{CompressionMethod, ZipArchive};

// Deterministic package writer used for Office Open XML output:
// - entries sorted lexicographically by name
// - fixed timestamps (DOS epoch equivalent)
// - fixed compression method/level
// - fixed permissions
// - empty zip comment
pub fn write_package_deterministic(entries: &[(String, Vec<u8>)]) -> CoreResult<Vec<u8>> {
    let mut sorted: Vec<&(String, Vec<u8>)> = entries.iter().collect();
    sorted.sort_by(|a, b| a.0.cmp(&b.0));

    let mut zw = ZipWriter::new(Cursor::new(Vec::new()));

    // DOS epoch (zip format): earliest representable time is 1980-01-01.
    let fixed_time = zip::DateTime::from_date_and_time(1980, 1, 1, 0, 0, 0)
        .map_err(|_| CoreError::Zip("failed to create fixed zip datetime".to_string()))?;

    let opts = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .compression_level(Some(9))
        .last_modified_time(fixed_time)
        .unix_permissions(0o644);

    for (name, bytes) in sorted {
        zw.start_file(name.as_str(), opts)?;
        zw.write_all(bytes)?;
    }

    zw.set_comment("");
    let cursor = zw.finish()?;
    Ok(cursor.into_inner())
}

/// Reads one named entry of a zip package as UTF-8 text.
pub fn read_package_entry(package: &[u8], name: &str) -> CoreResult<String> {
    let mut archive = ZipArchive::new(Cursor::new(package))?;
    let mut entry = archive.by_name(name)?;
    let mut out = String::new();
    entry
        .read_to_string(&mut out)
        .map_err(|e| CoreError::Parse(format!("{} is not UTF-8 text: {}", name, e)))?;
    Ok(out)
}
