use std::fs;
use std::path::Path;

/// Create an OSC8 file:// hyperlink so the gallery path is clickable in the terminal
pub fn osc8_file_link(path: &Path) -> String {
    let abs_path = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
    format!(
        "\x1b]8;;file://{}\x1b\\{}\x1b]8;;\x1b\\",
        abs_path.display(),
        path.display()
    )
}
