//! Filesystem infrastructure: implements `LocalFiles`.

use std::fs::File;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use walkdir::WalkDir;
use zip::CompressionMethod;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use crate::application::ports::LocalFiles;

/// Production filesystem implementation of `LocalFiles`.
pub struct LocalFs;

impl LocalFiles for LocalFs {
    fn read_template(&self, path: &Path) -> Result<String> {
        std::fs::read_to_string(path)
            .with_context(|| format!("cannot read template {}", path.display()))
    }

    async fn archive_directory(&self, dir: &Path) -> Result<Vec<u8>> {
        let dir = dir.to_path_buf();
        tokio::task::spawn_blocking(move || zip_directory(&dir))
            .await
            .context("spawn_blocking for archive_directory")?
    }

    fn current_dir(&self) -> Result<PathBuf> {
        std::env::current_dir().context("cannot determine working directory")
    }
}

/// Deflate every regular file under `dir` into an in-memory zip.
///
/// Entry names are relative to `dir` with `/` separators, in file-name
/// order so repeated runs produce the same archive layout.
///
/// # Errors
///
/// Returns an error if `dir` cannot be walked or a file cannot be read.
pub fn zip_directory(dir: &Path) -> Result<Vec<u8>> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.with_context(|| format!("cannot walk {}", dir.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let relative = entry.path().strip_prefix(dir)?;
        let name = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        writer
            .start_file(name, options)
            .context("cannot start zip entry")?;
        let mut file = File::open(entry.path())
            .with_context(|| format!("cannot open {}", entry.path().display()))?;
        std::io::copy(&mut file, &mut writer)
            .with_context(|| format!("cannot archive {}", entry.path().display()))?;
    }

    let cursor = writer.finish().context("cannot finish zip archive")?;
    Ok(cursor.into_inner())
}
