//! Staging directories holding the original and anonymized copies

use crate::archive::archive_path;
use crate::discovery::Discovery;
use crate::error::{DicatError, Result};
use crate::fields::FieldSet;
use log::{debug, info, warn};
use std::fs;
use std::path::{Path, PathBuf};

/// Suffix appended to the anonymized staging directory
pub const ANONYMIZED_SUFFIX: &str = "_anonymized";

/// Fallback when neither PatientName nor the root name is usable
const DEFAULT_STAGING_NAME: &str = "dicom";

/// Names of the two staging directories
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagingNames {
    pub original: String,
    pub anonymized: String,
}

/// The two staging directories on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagingDirs {
    pub original: PathBuf,
    pub anonymized: PathBuf,
}

impl StagingDirs {
    /// Removes both staging directories and any archive made from them
    ///
    /// Used after a failed run. Failures are logged, not returned.
    pub fn discard(&self) {
        for dir in [&self.original, &self.anonymized] {
            if dir.exists() {
                if let Err(e) = fs::remove_dir_all(dir) {
                    warn!("Could not remove {}: {}", dir.display(), e);
                }
            }
            let archive = archive_path(dir);
            if archive.exists() {
                if let Err(e) = fs::remove_file(&archive) {
                    warn!("Could not remove {}: {}", archive.display(), e);
                }
            }
        }
        debug!("Discarded staging output for {}", self.original.display());
    }
}

/// Derives staging names from the PatientName value
///
/// Falls back to the name of `root` when PatientName is unknown.
pub fn staging_names(fields: &FieldSet, root: &Path) -> StagingNames {
    let base = fields
        .patient_name()
        .map(str::to_string)
        .or_else(|| {
            root.file_name()
                .map(|n| n.to_string_lossy().into_owned())
        })
        .map(|n| sanitize(&n))
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| DEFAULT_STAGING_NAME.to_string());

    StagingNames {
        anonymized: format!("{}{}", base, ANONYMIZED_SUFFIX),
        original: base,
    }
}

/// Replaces characters that cannot appear in a directory name
fn sanitize(name: &str) -> String {
    let cleaned: String = name
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    if cleaned.chars().all(|c| c == '.') {
        String::new()
    } else {
        cleaned
    }
}

/// Creates both staging directories under `output_dir`, mirroring `subdirs`
///
/// # Errors
///
/// Returns [`DicatError::StagingExists`] if a staging directory or its
/// archive is already present.
pub fn create_directories(
    output_dir: &Path,
    names: &StagingNames,
    subdirs: &[PathBuf],
) -> Result<StagingDirs> {
    let dirs = StagingDirs {
        original: output_dir.join(&names.original),
        anonymized: output_dir.join(&names.anonymized),
    };

    for dir in [&dirs.original, &dirs.anonymized] {
        let archive = archive_path(dir);
        if dir.exists() {
            return Err(DicatError::StagingExists(dir.clone()));
        }
        if archive.exists() {
            return Err(DicatError::StagingExists(archive));
        }
    }

    fs::create_dir_all(output_dir)?;
    for dir in [&dirs.original, &dirs.anonymized] {
        fs::create_dir(dir)?;
        for subdir in subdirs {
            fs::create_dir_all(dir.join(subdir))?;
        }
    }

    info!(
        "Created staging directories {} and {}",
        dirs.original.display(),
        dirs.anonymized.display()
    );
    Ok(dirs)
}

/// Copies every discovered file into both staging trees
///
/// Returns the anonymized copies, in discovery order.
pub fn copy_into(discovery: &Discovery, dirs: &StagingDirs) -> Result<Vec<PathBuf>> {
    let mut anonymized = Vec::with_capacity(discovery.files.len());
    for file in &discovery.files {
        let rel = discovery.relative(file);
        let original_copy = dirs.original.join(&rel);
        let anonymized_copy = dirs.anonymized.join(&rel);

        fs::copy(file, &original_copy)?;
        fs::copy(file, &anonymized_copy)?;
        debug!("Staged {}", rel.display());

        anonymized.push(anonymized_copy);
    }
    Ok(anonymized)
}
