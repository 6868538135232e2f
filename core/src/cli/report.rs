use crate::fields::{tag_key, FieldSet};
use crate::pipeline::ArchivePair;
use std::fmt;
use std::path::Path;

/// Text report of configured fields and their current values
pub struct TextReport<'a> {
    fields: &'a FieldSet,
    source: &'a Path,
}

impl<'a> TextReport<'a> {
    /// Creates a new text report
    pub fn new(fields: &'a FieldSet, source: &'a Path) -> Self {
        Self { fields, source }
    }
}

impl<'a> fmt::Display for TextReport<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "DICOM Header Fields")?;
        writeln!(f, "===================")?;
        writeln!(f, "Source: {}", self.source.display())?;
        writeln!(f)?;

        for field in self.fields.iter() {
            writeln!(
                f,
                "({}) {:<28} {:<8} {}",
                tag_key(field.tag),
                field.description,
                if field.editable { "editable" } else { "zapped" },
                field.effective_value().unwrap_or("-")
            )?;
        }

        Ok(())
    }
}

/// Summary printed after an anonymization run
pub struct ArchiveReport<'a> {
    pair: &'a ArchivePair,
    tool: &'a str,
}

impl<'a> ArchiveReport<'a> {
    pub fn new(pair: &'a ArchivePair, tool: &'a str) -> Self {
        Self { pair, tool }
    }
}

impl<'a> fmt::Display for ArchiveReport<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Header tool:       {}", self.tool)?;
        writeln!(f, "Files processed:   {}", self.pair.files_processed)?;
        writeln!(f, "Original archive:  {}", self.pair.original_zip.display())?;
        write!(f, "Anonymized archive: {}", self.pair.anonymized_zip.display())
    }
}
