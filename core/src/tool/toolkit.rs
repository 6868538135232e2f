use super::HeaderTool;
use crate::error::{DicatError, Result};
use crate::fields::tags::{is_meta_tag, tag_key};
use crate::fields::{FieldSet, FieldWrite};
use log::{debug, warn};
use regex::Regex;
use std::ffi::OsString;
use std::path::Path;
use std::process::Command;
use std::sync::OnceLock;

pub const DCMDUMP: &str = "dcmdump";
pub const DCMODIFY: &str = "dcmodify";

/// Header tool driving the DCMTK executables
#[derive(Debug, Clone, Copy, Default)]
pub struct ToolkitTool;

impl HeaderTool for ToolkitTool {
    fn name(&self) -> &'static str {
        "dcmtk"
    }

    fn read_values(&self, file: &Path, fields: &mut FieldSet) -> Result<()> {
        for field in fields.iter_mut() {
            let output = Command::new(DCMDUMP)
                .args(dump_args(field.tag, file))
                .output()?;
            if !output.status.success() {
                return Err(DicatError::ToolFailed {
                    tool: DCMDUMP.to_string(),
                    file: file.to_path_buf(),
                    message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
                });
            }

            let stdout = String::from_utf8_lossy(&output.stdout);
            match parse_dump_value(&stdout) {
                Some(value) => field.value = Some(value),
                None => debug!("Skipping {} ({}): not in dump", tag_key(field.tag), field.description),
            }
        }
        Ok(())
    }

    fn write_fields(&self, file: &Path, fields: &FieldSet) -> Result<usize> {
        let writes: Vec<FieldWrite> = fields
            .planned_writes()
            .into_iter()
            .filter(|w| {
                let meta = is_meta_tag(w.tag());
                if meta {
                    warn!("Refusing to modify file meta tag {}", tag_key(w.tag()));
                }
                !meta
            })
            .collect();

        if writes.is_empty() {
            debug!("Nothing to modify in {}", file.display());
            return Ok(0);
        }

        let output = Command::new(DCMODIFY)
            .args(modify_args(&writes, file))
            .output()?;
        if !output.status.success() {
            return Err(DicatError::ToolFailed {
                tool: DCMODIFY.to_string(),
                file: file.to_path_buf(),
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        // dcmodify does not report which tags existed
        Ok(writes.len())
    }
}

/// Arguments for `dcmdump` printing a single tag
pub fn dump_args(tag: dicom_core::Tag, file: &Path) -> Vec<OsString> {
    vec![
        "-ml".into(),
        "+P".into(),
        tag_key(tag).into(),
        "-q".into(),
        file.as_os_str().to_os_string(),
    ]
}

/// Arguments for one `dcmodify` call applying every write to `file`
///
/// No backup file is kept and missing tags are not inserted.
pub fn modify_args(writes: &[FieldWrite], file: &Path) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec!["-nb".into(), "-imt".into()];
    for write in writes {
        args.push("-ma".into());
        args.push(format!("({})={}", tag_key(write.tag()), write.value()).into());
    }
    args.push(file.as_os_str().to_os_string());
    args
}

/// Extracts the bracketed value from a `dcmdump` line
pub fn parse_dump_value(output: &str) -> Option<String> {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    let re = REGEX.get_or_init(|| Regex::new(r"\[([^\]]*)\]").expect("Failed to compile regex"));

    re.captures(output)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::tags::{PATIENT_BIRTH_DATE, PATIENT_NAME};
    use rstest::rstest;
    use std::path::PathBuf;

    #[rstest]
    #[case(
        "(0010,0010) PN [Doe^Jane]                               #   8, 1 PatientName\n",
        Some("Doe^Jane")
    )]
    #[case(
        "(0008,0080) LO [General Hospital ]                      #  18, 1 InstitutionName\n",
        Some("General Hospital")
    )]
    #[case(
        "(0010,0030) DA (no value available)                     #   0, 0 PatientBirthDate\n",
        None
    )]
    #[case("", None)]
    fn test_parse_dump_value(#[case] output: &str, #[case] expected: Option<&str>) {
        assert_eq!(parse_dump_value(output).as_deref(), expected);
    }

    #[test]
    fn test_dump_args() {
        let args = dump_args(PATIENT_NAME, Path::new("/data/IM1"));
        let expected: Vec<OsString> = ["-ml", "+P", "0010,0010", "-q", "/data/IM1"]
            .iter()
            .map(OsString::from)
            .collect();
        assert_eq!(args, expected);
    }

    #[test]
    fn test_modify_args() {
        let writes = vec![
            FieldWrite::Set(PATIENT_NAME, "CANDID 001".to_string()),
            FieldWrite::Blank(PATIENT_BIRTH_DATE),
        ];
        let file = PathBuf::from("/tmp/out/IM1");
        let args = modify_args(&writes, &file);
        let expected: Vec<OsString> = [
            "-nb",
            "-imt",
            "-ma",
            "(0010,0010)=CANDID 001",
            "-ma",
            "(0010,0030)=",
            "/tmp/out/IM1",
        ]
        .iter()
        .map(OsString::from)
        .collect();
        assert_eq!(args, expected);
    }

    #[test]
    fn test_write_fields_nothing_planned() {
        let fields = FieldSet::default();
        let written = ToolkitTool
            .write_fields(Path::new("/nonexistent/IM1"), &fields)
            .unwrap();
        assert_eq!(written, 0);
    }
}
