use std::path::PathBuf;
use thiserror::Error;

/// Result type for dicat operations
pub type Result<T> = std::result::Result<T, DicatError>;

/// Error types for dicat operations
#[derive(Error, Debug)]
pub enum DicatError {
    /// DICOM reading error
    #[error("DICOM error: {0}")]
    DicomError(String),

    /// DICOM writing error
    #[error("DICOM write error: {0}")]
    DicomWriteError(String),

    /// Tag identifier could not be parsed
    #[error("Invalid tag: {0}")]
    InvalidTag(String),

    /// Malformed or inconsistent field-definition file
    #[error("Field definition error: {0}")]
    FieldDefinition(String),

    /// Operator tried to edit a field that cannot be edited
    #[error("Field {0} is not editable")]
    NotEditable(String),

    /// Operator referenced a tag that is not in the field set
    #[error("Field {0} is not configured")]
    UnknownField(String),

    /// Input root is missing or not a directory
    #[error("{} is not a directory", .0.display())]
    NotADirectory(PathBuf),

    /// Discovery found nothing to process
    #[error("Could not find any files in {}", .0.display())]
    NoFilesFound(PathBuf),

    /// A staging directory is already present on disk
    #[error("Staging directory {} already exists", .0.display())]
    StagingExists(PathBuf),

    /// Refused to archive an empty directory
    #[error("The directory {} is empty and will not be archived", .0.display())]
    EmptyDirectory(PathBuf),

    /// Archive was not present after writing it
    #[error("{} could not be created", .0.display())]
    ArchiveMissing(PathBuf),

    /// Archive writer failure
    #[error("Archive error: {0}")]
    ArchiveError(String),

    /// No usable header tool
    #[error("No DICOM tool available: {0}")]
    NoToolAvailable(String),

    /// External tool exited with failure
    #[error("{tool} failed on {}: {message}", .file.display())]
    ToolFailed {
        tool: String,
        file: PathBuf,
        message: String,
    },

    /// Directory traversal error
    #[error("Walk error: {0}")]
    WalkError(String),

    /// I/O error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

// Convert dicom-object errors
impl From<dicom_object::ReadError> for DicatError {
    fn from(e: dicom_object::ReadError) -> Self {
        DicatError::DicomError(format!("{}", e))
    }
}

impl From<dicom_object::WriteError> for DicatError {
    fn from(e: dicom_object::WriteError) -> Self {
        DicatError::DicomWriteError(format!("{}", e))
    }
}

impl From<zip::result::ZipError> for DicatError {
    fn from(e: zip::result::ZipError) -> Self {
        DicatError::ArchiveError(format!("{}", e))
    }
}

impl From<walkdir::Error> for DicatError {
    fn from(e: walkdir::Error) -> Self {
        DicatError::WalkError(format!("{}", e))
    }
}

impl From<quick_xml::DeError> for DicatError {
    fn from(e: quick_xml::DeError) -> Self {
        DicatError::FieldDefinition(format!("{}", e))
    }
}

impl From<serde_json::Error> for DicatError {
    fn from(e: serde_json::Error) -> Self {
        DicatError::FieldDefinition(format!("{}", e))
    }
}
