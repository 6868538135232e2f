//! Zip archives of staging directories

use crate::error::{DicatError, Result};
use log::info;
use std::ffi::OsString;
use std::fs::{self, File};
use std::io;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Path of the archive produced for `dir`: `<dir>.zip`
pub fn archive_path(dir: &Path) -> PathBuf {
    let mut name: OsString = dir.as_os_str().to_os_string();
    name.push(".zip");
    PathBuf::from(name)
}

/// Compresses `dir` into `<dir>.zip`, then removes `dir`
///
/// # Errors
///
/// Returns an error if `dir` is empty, if writing the archive fails, or
/// if the archive is missing once written. `dir` is only removed after
/// the archive is confirmed on disk.
pub fn zip_directory(dir: &Path) -> Result<PathBuf> {
    if fs::read_dir(dir)?.next().is_none() {
        return Err(DicatError::EmptyDirectory(dir.to_path_buf()));
    }

    let archive = archive_path(dir);
    write_archive(dir, &archive)?;

    if !archive.is_file() {
        return Err(DicatError::ArchiveMissing(archive));
    }

    fs::remove_dir_all(dir)?;
    info!("Archived {} to {}", dir.display(), archive.display());
    Ok(archive)
}

fn write_archive(dir: &Path, archive: &Path) -> Result<()> {
    let mut zip = ZipWriter::new(File::create(archive)?);

    for entry in WalkDir::new(dir).min_depth(1).sort_by_file_name() {
        let entry = entry?;
        let rel = entry
            .path()
            .strip_prefix(dir)
            .map_err(|e| DicatError::ArchiveError(e.to_string()))?;
        let name = entry_name(rel);

        if entry.file_type().is_dir() {
            zip.add_directory(name, file_options())?;
        } else {
            zip.start_file(name, file_options())?;
            let mut source = File::open(entry.path())?;
            io::copy(&mut source, &mut zip)?;
        }
    }

    zip.finish()?;
    Ok(())
}

fn file_options() -> SimpleFileOptions {
    SimpleFileOptions::default().compression_method(CompressionMethod::Deflated)
}

/// Archive entry name: relative components joined with `/`
fn entry_name(rel: &Path) -> String {
    rel.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
