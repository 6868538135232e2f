pub mod archive;
pub mod cli;
pub mod discovery;
pub mod error;
pub mod fields;
pub mod pipeline;
pub mod staging;
pub mod tool;

#[cfg(test)]
mod test_support;

pub use cli::report::{ArchiveReport, TextReport};
pub use discovery::{discover, is_dicom_file, Discovery};
pub use error::{DicatError, Result};
pub use fields::{FieldSet, FieldWrite, HeaderField};
pub use pipeline::{AnonymizeOptions, Anonymizer, ArchivePair};
pub use tool::{find_anonymizer_tool, HeaderTool, ToolPreference};
