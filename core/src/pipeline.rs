use crate::archive::zip_directory;
use crate::discovery::{discover, Discovery};
use crate::error::{DicatError, Result};
use crate::fields::FieldSet;
use crate::staging::{copy_into, create_directories, staging_names, StagingDirs};
use crate::tool::{find_anonymizer_tool, HeaderTool, ToolPreference};
use log::{debug, info, warn};
use std::fs;
use std::path::{Path, PathBuf};

/// Options for an anonymization run
///
/// # Example
///
/// ```
/// use dicat_core::{AnonymizeOptions, ToolPreference};
///
/// let options = AnonymizeOptions::default()
///     .with_output_dir("/tmp/out")
///     .remove_source(true);
///
/// assert!(options.remove_source);
/// assert_eq!(options.tool, ToolPreference::Auto);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnonymizeOptions {
    /// Where staging directories and archives go; defaults to the input root
    pub output_dir: Option<PathBuf>,

    /// Delete source files and subdirectories once both archives exist
    pub remove_source: bool,

    /// Header tool preference
    pub tool: ToolPreference,
}

impl AnonymizeOptions {
    /// Builder: Set the output directory
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    /// Builder: Remove the source tree after archiving
    pub fn remove_source(mut self, remove: bool) -> Self {
        self.remove_source = remove;
        self
    }

    /// Builder: Set the header tool preference
    pub fn with_tool(mut self, tool: ToolPreference) -> Self {
        self.tool = tool;
        self
    }
}

/// Archives produced by a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchivePair {
    /// Zip of the untouched copies
    pub original_zip: PathBuf,

    /// Zip of the rewritten copies
    pub anonymized_zip: PathBuf,

    /// Number of files copied into each archive
    pub files_processed: usize,
}

/// Runs header reads and the anonymization pipeline with one tool
pub struct Anonymizer {
    tool: Box<dyn HeaderTool>,
}

impl Anonymizer {
    pub fn new(tool: Box<dyn HeaderTool>) -> Self {
        Self { tool }
    }

    /// Builds an anonymizer from the tool the options ask for
    pub fn from_options(options: &AnonymizeOptions) -> Result<Self> {
        Ok(Self::new(find_anonymizer_tool(options.tool)?))
    }

    pub fn tool_name(&self) -> &'static str {
        self.tool.name()
    }

    /// Reads current values of `fields` from the reference file under `root`
    ///
    /// Returns the path of the file that was read.
    pub fn read_values(&self, root: &Path, fields: &mut FieldSet) -> Result<PathBuf> {
        let discovery = discover(root)?;
        let reference = discovery
            .reference_file()
            .ok_or_else(|| DicatError::NoFilesFound(root.to_path_buf()))?
            .to_path_buf();

        info!("Reading header values from {}", reference.display());
        self.tool.read_values(&reference, fields)?;
        Ok(reference)
    }

    /// Produces the original and anonymized archives for `root`
    ///
    /// On failure the staging directories and any archive already written
    /// are removed, so a corrected run can reuse the same names.
    ///
    /// # Errors
    ///
    /// Fails if no input file is found, if staging or rewriting fails, or
    /// if either archive cannot be produced.
    pub fn anonymize(
        &self,
        root: &Path,
        fields: &FieldSet,
        options: &AnonymizeOptions,
    ) -> Result<ArchivePair> {
        let discovery = discover(root)?;
        let output_dir = options.output_dir.as_deref().unwrap_or(root);

        let names = staging_names(fields, root);
        let dirs = create_directories(output_dir, &names, &discovery.subdirs)?;

        let pair = match self.stage_and_archive(&discovery, &dirs, fields) {
            Ok(pair) => pair,
            Err(e) => {
                warn!("Run failed, removing staging output: {}", e);
                dirs.discard();
                return Err(e);
            }
        };

        if options.remove_source {
            remove_sources(&discovery)?;
        }
        Ok(pair)
    }

    fn stage_and_archive(
        &self,
        discovery: &Discovery,
        dirs: &StagingDirs,
        fields: &FieldSet,
    ) -> Result<ArchivePair> {
        let copies = copy_into(discovery, dirs)?;

        for copy in &copies {
            let changed = self.tool.write_fields(copy, fields)?;
            debug!("{}: {} fields changed", copy.display(), changed);
        }
        info!("Anonymized {} files with {}", copies.len(), self.tool.name());

        let original_zip = zip_directory(&dirs.original)?;
        let anonymized_zip = zip_directory(&dirs.anonymized)?;

        Ok(ArchivePair {
            original_zip,
            anonymized_zip,
            files_processed: copies.len(),
        })
    }
}

/// Deletes the discovered files, then the subdirectories that held them
fn remove_sources(discovery: &Discovery) -> Result<()> {
    for file in &discovery.files {
        fs::remove_file(file)?;
    }

    // Children before parents
    for subdir in discovery.subdirs.iter().rev() {
        let path = discovery.root.join(subdir);
        if let Err(e) = fs::remove_dir(&path) {
            warn!("Leaving {} in place: {}", path.display(), e);
        }
    }

    info!("Removed source files under {}", discovery.root.display());
    Ok(())
}
