use super::{parse_tag, FieldSet, HeaderField};
use crate::error::{DicatError, Result};
use log::debug;
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct XmlDefinitions {
    #[serde(rename = "item", default)]
    items: Vec<XmlItem>,
}

#[derive(Debug, Deserialize)]
struct XmlItem {
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    editable: String,
}

#[derive(Debug, Deserialize)]
struct JsonItem {
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    editable: bool,
}

impl FieldSet {
    /// Parses the XML definition format
    ///
    /// ```
    /// use dicat_core::FieldSet;
    ///
    /// let xml = r#"
    /// <fields>
    ///   <item>
    ///     <name>0010,0010</name>
    ///     <description>PatientName</description>
    ///     <editable>yes</editable>
    ///   </item>
    /// </fields>"#;
    ///
    /// let fields = FieldSet::from_xml_str(xml).unwrap();
    /// assert_eq!(fields.len(), 1);
    /// ```
    pub fn from_xml_str(s: &str) -> Result<Self> {
        let defs: XmlDefinitions = quick_xml::de::from_str(s)?;
        let fields = defs
            .items
            .into_iter()
            .map(|item| -> Result<HeaderField> {
                let tag = parse_tag(&item.name)?;
                // Only the literal "yes" grants edit rights
                let editable = item.editable.trim() == "yes";
                Ok(HeaderField::new(tag, item.description.trim(), editable))
            })
            .collect::<Result<Vec<_>>>()?;
        FieldSet::from_fields(fields)
    }

    /// Parses a JSON array of `{name, description, editable}` objects
    pub fn from_json_str(s: &str) -> Result<Self> {
        let items: Vec<JsonItem> = serde_json::from_str(s)?;
        let fields = items
            .into_iter()
            .map(|item| -> Result<HeaderField> {
                Ok(HeaderField::new(
                    parse_tag(&item.name)?,
                    item.description.trim(),
                    item.editable,
                ))
            })
            .collect::<Result<Vec<_>>>()?;
        FieldSet::from_fields(fields)
    }

    /// Loads a field-definition file, choosing the parser by extension
    pub fn load(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        let contents = fs::read_to_string(path)?;

        let set = match ext.as_deref() {
            Some("xml") => Self::from_xml_str(&contents)?,
            Some("json") => Self::from_json_str(&contents)?,
            _ => {
                return Err(DicatError::FieldDefinition(format!(
                    "unsupported definition file {} (expected .xml or .json)",
                    path.display()
                )))
            }
        };

        debug!("Loaded {} field definitions from {}", set.len(), path.display());
        Ok(set)
    }
}

#[cfg(test)]
mod tests {
    use super::super::tags::{PATIENT_BIRTH_DATE, PATIENT_ID, PATIENT_NAME};
    use super::*;
    use tempfile::TempDir;

    const XML: &str = r#"<?xml version="1.0"?>
<fields>
  <item>
    <name>0010,0010</name>
    <description>PatientName</description>
    <editable>yes</editable>
  </item>
  <item>
    <name>0010,0030</name>
    <description>PatientBirthDate</description>
    <editable>no</editable>
  </item>
  <item>
    <name>0010,0020</name>
    <description>PatientID</description>
    <editable>Yes</editable>
  </item>
</fields>"#;

    #[test]
    fn test_from_xml_str() {
        let set = FieldSet::from_xml_str(XML).unwrap();
        assert_eq!(set.len(), 3);

        let name = set.get(PATIENT_NAME).unwrap();
        assert_eq!(name.description, "PatientName");
        assert!(name.editable);
        assert!(name.value.is_none());

        assert!(!set.get(PATIENT_BIRTH_DATE).unwrap().editable);
        // Case matters: only "yes" is editable
        assert!(!set.get(PATIENT_ID).unwrap().editable);
    }

    #[test]
    fn test_from_xml_keeps_order() {
        let set = FieldSet::from_xml_str(XML).unwrap();
        let tags: Vec<_> = set.iter().map(|f| f.tag).collect();
        assert_eq!(tags, vec![PATIENT_NAME, PATIENT_BIRTH_DATE, PATIENT_ID]);
    }

    #[test]
    fn test_from_xml_bad_tag() {
        let xml = "<fields><item><name>nope</name><description>x</description><editable>no</editable></item></fields>";
        assert!(matches!(
            FieldSet::from_xml_str(xml),
            Err(DicatError::InvalidTag(_))
        ));
    }

    #[test]
    fn test_from_json_str() {
        let json = r#"[
            {"name": "0010,0010", "description": "PatientName", "editable": true},
            {"name": "PatientBirthDate", "description": "PatientBirthDate"}
        ]"#;
        let set = FieldSet::from_json_str(json).unwrap();
        assert!(set.get(PATIENT_NAME).unwrap().editable);
        assert!(!set.get(PATIENT_BIRTH_DATE).unwrap().editable);
    }

    #[test]
    fn test_load_by_extension() {
        let dir = TempDir::new().unwrap();
        let xml_path = dir.path().join("fields.xml");
        fs::write(&xml_path, XML).unwrap();
        assert_eq!(FieldSet::load(&xml_path).unwrap().len(), 3);

        let other = dir.path().join("fields.yaml");
        fs::write(&other, "").unwrap();
        assert!(matches!(
            FieldSet::load(&other),
            Err(DicatError::FieldDefinition(_))
        ));
    }
}
