//! Header tools used to read and rewrite DICOM fields
//!
//! Two backends are available:
//! - [`LibraryTool`]: dicom-rs, always compiled in
//! - [`ToolkitTool`]: the DCMTK `dcmdump`/`dcmodify` executables

mod library;
mod toolkit;

use crate::error::{DicatError, Result};
use crate::fields::FieldSet;
use clap::ValueEnum;
use log::{debug, info};
use std::path::Path;
use std::process::{Command, Stdio};

pub use library::LibraryTool;
pub use toolkit::{ToolkitTool, DCMDUMP, DCMODIFY};

/// Reads and rewrites configured header fields of a single file
pub trait HeaderTool {
    /// Short name used in logs and reports
    fn name(&self) -> &'static str;

    /// Fills `fields` with the values found in `file`
    ///
    /// Fields missing from the file keep their previous value.
    fn read_values(&self, file: &Path, fields: &mut FieldSet) -> Result<()>;

    /// Applies the planned writes of `fields` to `file` in place
    ///
    /// Returns the number of elements that were modified.
    fn write_fields(&self, file: &Path, fields: &FieldSet) -> Result<usize>;
}

/// Which backend the operator asked for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ToolPreference {
    /// Use the built-in DICOM library
    #[default]
    Auto,
    /// Force the built-in DICOM library
    Library,
    /// Use the DCMTK command-line toolkit
    Toolkit,
}

/// Determines the header tool to use
///
/// # Errors
///
/// Returns [`DicatError::NoToolAvailable`] when the toolkit is requested
/// but its executables cannot be run.
pub fn find_anonymizer_tool(preference: ToolPreference) -> Result<Box<dyn HeaderTool>> {
    let tool: Box<dyn HeaderTool> = match preference {
        ToolPreference::Auto | ToolPreference::Library => Box::new(LibraryTool),
        ToolPreference::Toolkit => {
            for exe in [DCMDUMP, DCMODIFY] {
                if !test_executable(exe) {
                    return Err(DicatError::NoToolAvailable(format!(
                        "{} was not found on PATH",
                        exe
                    )));
                }
            }
            Box::new(ToolkitTool)
        }
    };
    info!("Using {} to read and anonymize headers", tool.name());
    Ok(tool)
}

/// Tests whether an executable can be spawned
///
/// The program is run with `--version` and its output is discarded.
pub fn test_executable(executable: &str) -> bool {
    let spawned = Command::new(executable)
        .arg("--version")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();

    match spawned {
        Ok(_) => true,
        Err(e) => {
            debug!("{} is not runnable: {}", executable, e);
            false
        }
    }
}
