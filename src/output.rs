use chrono::NaiveDateTime;
use std::fs;
use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

use crate::error::{GalleryError, Result};

/// `gallery_<YYYYMMDD>_<HHMMSS>.html`
pub fn gallery_file_name(generated_at: &NaiveDateTime) -> String {
    format!("gallery_{}.html", generated_at.format("%Y%m%d_%H%M%S"))
}

/// `gallery_x.html` -> `gallery_x_<n>.html`
fn numbered_name(name: &str, n: usize) -> String {
    match name.rsplit_once('.') {
        Some((stem, ext)) => format!("{}_{}.{}", stem, n, ext),
        None => format!("{}_{}", name, n),
    }
}

/// Temp file with the same default mode as any other newly created file
fn temp_file_in(dir: &Path) -> io::Result<NamedTempFile> {
    let mut builder = tempfile::Builder::new();
    builder.prefix(".gallery");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(fs::Permissions::from_mode(0o666));
    }
    builder.tempfile_in(dir)
}

/// Write `content` to `output_dir/name` in one step: the file only appears once fully written.
///
/// An existing file is never replaced; the name gets a numeric suffix instead.
pub fn write_gallery(output_dir: &Path, name: &str, content: &str) -> Result<PathBuf> {
    let write_err = |path: PathBuf, source| GalleryError::OutputWrite { path, source };
    let first = output_dir.join(name);

    fs::create_dir_all(output_dir).map_err(|e| write_err(first.clone(), e))?;
    let mut tmp = temp_file_in(output_dir).map_err(|e| write_err(first.clone(), e))?;
    tmp.write_all(content.as_bytes())
        .map_err(|e| write_err(first.clone(), e))?;
    tmp.as_file()
        .sync_all()
        .map_err(|e| write_err(first.clone(), e))?;

    let mut attempt = 0;
    loop {
        let target = match attempt {
            0 => first.clone(),
            n => output_dir.join(numbered_name(name, n)),
        };
        match tmp.persist_noclobber(&target) {
            Ok(_) => return Ok(target),
            Err(e) if e.error.kind() == ErrorKind::AlreadyExists => {
                tmp = e.file;
                attempt += 1;
            }
            Err(e) => return Err(write_err(target, e.error)),
        }
    }
}
