use crate::intake::UploadFile;
use crate::schemas::format_number;

const SIZE_UNITS: [&str; 3] = ["Bytes", "KB", "MB"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub name: String,
    pub icon: &'static str,
    pub label: String,
}

/// Rebuilds the upload list from a fresh selection; earlier entries go.
pub fn list_files(files: &[UploadFile]) -> Vec<FileEntry> {
    files
        .iter()
        .map(|file| FileEntry {
            name: file.name.clone(),
            icon: file_icon(&file.mime),
            label: format!("{} ({})", file.name, format_file_size(file.size())),
        })
        .collect()
}

pub fn remove_file(entries: &mut Vec<FileEntry>, index: usize) -> Option<FileEntry> {
    (index < entries.len()).then(|| entries.remove(index))
}

pub fn file_icon(mime: &str) -> &'static str {
    if mime.contains("pdf") {
        "fa-file-pdf"
    } else if mime.contains("image") {
        "fa-file-image"
    } else {
        "fa-file"
    }
}

/// Human-readable size with at most two decimals. Anything past megabytes is
/// still shown in megabytes.
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < SIZE_UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let rounded = (value * 100.0).round() / 100.0;
    format!("{} {}", format_number(rounded), SIZE_UNITS[unit])
}
