//! Recursive discovery of candidate DICOM files

use crate::error::{DicatError, Result};
use log::{debug, info};
use regex::Regex;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use walkdir::WalkDir;

/// File names that are never treated as DICOM candidates
const EXCLUDED_PATTERN: &str = r"\.bmp$|\.png$|\.zip$|\.txt$|\.jpeg$|\.pdf$|\.DS_Store";

/// Files and subdirectories found under a root directory
#[derive(Debug, Clone, PartialEq)]
pub struct Discovery {
    /// Root that was walked
    pub root: PathBuf,

    /// Candidate DICOM files (full paths), in walk order
    pub files: Vec<PathBuf>,

    /// Subdirectories, relative to `root`, parents before children
    pub subdirs: Vec<PathBuf>,
}

impl Discovery {
    /// Path of `file` relative to the root
    pub fn relative(&self, file: &Path) -> PathBuf {
        file.strip_prefix(&self.root)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| PathBuf::from(file.file_name().unwrap_or_default()))
    }

    /// File used to read current header values
    ///
    /// The first candidate carrying a DICOM header wins; if none does,
    /// falls back to the first candidate.
    pub fn reference_file(&self) -> Option<&Path> {
        self.files
            .iter()
            .find(|f| is_dicom_file(f))
            .or_else(|| self.files.first())
            .map(PathBuf::as_path)
    }
}

/// Whether a file name matches the non-DICOM exclusion pattern
pub fn is_excluded(file_name: &str) -> bool {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    let re = REGEX.get_or_init(|| Regex::new(EXCLUDED_PATTERN).expect("Failed to compile regex"));
    re.is_match(file_name)
}

/// Recursively enumerates candidate files and subdirectories under `root`
///
/// # Errors
///
/// Returns an error if `root` is not a directory, if the walk fails, or
/// if no candidate file is found.
pub fn discover(root: &Path) -> Result<Discovery> {
    if !root.is_dir() {
        return Err(DicatError::NotADirectory(root.to_path_buf()));
    }

    let mut files = Vec::new();
    let mut subdirs = Vec::new();

    for entry in WalkDir::new(root)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
    {
        let entry = entry?;
        let path = entry.path();

        if entry.file_type().is_dir() {
            if let Ok(rel) = path.strip_prefix(root) {
                subdirs.push(rel.to_path_buf());
            }
        } else if entry.file_type().is_file() {
            let name = entry.file_name().to_string_lossy();
            if is_excluded(&name) {
                debug!("Excluding {}", path.display());
            } else {
                files.push(path.to_path_buf());
            }
        }
    }

    if files.is_empty() {
        return Err(DicatError::NoFilesFound(root.to_path_buf()));
    }

    info!(
        "Found {} files in {} subdirectories under {}",
        files.len(),
        subdirs.len(),
        root.display()
    );

    Ok(Discovery {
        root: root.to_path_buf(),
        files,
        subdirs,
    })
}

/// Checks if a file has a DICOM header
///
/// DICOM files typically have:
/// - 128-byte preamble
/// - 4-byte "DICM" magic string at offset 128
pub fn is_dicom_file(path: &Path) -> bool {
    let mut file = match File::open(path) {
        Ok(f) => f,
        Err(_) => return false,
    };

    // Read first 132 bytes (128-byte preamble + 4-byte "DICM" magic)
    let mut buffer = [0u8; 132];
    match file.read_exact(&mut buffer) {
        Ok(()) => &buffer[128..132] == b"DICM",
        Err(_) => false,
    }
}
