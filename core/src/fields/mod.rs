//! Configurable header fields
//!
//! A [`FieldSet`] is loaded from a field-definition file and carries, for
//! each DICOM tag, whether the operator may edit it and the value that
//! will be written into the anonymized copies.

mod definition;
pub mod tags;

use crate::error::{DicatError, Result};
use dicom_core::Tag;
use serde::Serialize;

pub use tags::{parse_tag, tag_key, PATIENT_NAME};

/// Default field-definition file shipped with the binary
pub const DEFAULT_FIELDS_XML: &str = include_str!("../../data/fields_to_zap.xml");

/// A single configured header field
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeaderField {
    /// DICOM tag
    #[serde(serialize_with = "serialize_tag")]
    pub tag: Tag,

    /// Human-readable description (usually the dictionary keyword)
    pub description: String,

    /// Whether the operator may supply a replacement value
    pub editable: bool,

    /// Value read from the reference file's header
    pub value: Option<String>,

    /// Value supplied by the operator, written into every anonymized file
    pub replacement: Option<String>,
}

fn serialize_tag<S: serde::Serializer>(tag: &Tag, s: S) -> std::result::Result<S::Ok, S::Error> {
    s.serialize_str(&tag_key(*tag))
}

impl HeaderField {
    /// Creates a field without a value
    pub fn new(tag: Tag, description: impl Into<String>, editable: bool) -> Self {
        Self {
            tag,
            description: description.into(),
            editable,
            value: None,
            replacement: None,
        }
    }

    /// Operator replacement if any, else the value read from the header
    pub fn effective_value(&self) -> Option<&str> {
        self.replacement.as_deref().or(self.value.as_deref())
    }

    /// Returns the write this field produces on every anonymized file
    pub fn planned_write(&self) -> Option<FieldWrite> {
        if !self.editable {
            Some(FieldWrite::Blank(self.tag))
        } else {
            self.replacement
                .as_ref()
                .map(|v| FieldWrite::Set(self.tag, v.clone()))
        }
    }
}

/// A modification to apply to a header element
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldWrite {
    /// Replace the value with an empty one
    Blank(Tag),
    /// Replace the value with the given string
    Set(Tag, String),
}

impl FieldWrite {
    pub fn tag(&self) -> Tag {
        match self {
            FieldWrite::Blank(tag) | FieldWrite::Set(tag, _) => *tag,
        }
    }

    pub fn value(&self) -> &str {
        match self {
            FieldWrite::Blank(_) => "",
            FieldWrite::Set(_, value) => value,
        }
    }
}

/// Ordered set of configured fields, one entry per tag
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FieldSet {
    fields: Vec<HeaderField>,
}

impl FieldSet {
    /// Builds a set from fields, rejecting duplicate tags
    pub fn from_fields(fields: Vec<HeaderField>) -> Result<Self> {
        let mut set = FieldSet::default();
        for field in fields {
            set.push(field)?;
        }
        Ok(set)
    }

    /// Returns the field set embedded in the binary
    pub fn default_fields() -> Result<Self> {
        Self::from_xml_str(DEFAULT_FIELDS_XML)
    }

    /// Appends a field
    ///
    /// # Errors
    ///
    /// Returns an error if the tag is already configured
    pub fn push(&mut self, field: HeaderField) -> Result<()> {
        if self.get(field.tag).is_some() {
            return Err(DicatError::FieldDefinition(format!(
                "duplicate field {}",
                tag_key(field.tag)
            )));
        }
        self.fields.push(field);
        Ok(())
    }

    pub fn get(&self, tag: Tag) -> Option<&HeaderField> {
        self.fields.iter().find(|f| f.tag == tag)
    }

    pub fn get_mut(&mut self, tag: Tag) -> Option<&mut HeaderField> {
        self.fields.iter_mut().find(|f| f.tag == tag)
    }

    pub fn iter(&self) -> impl Iterator<Item = &HeaderField> {
        self.fields.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut HeaderField> {
        self.fields.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Records an operator-supplied value for an editable field
    ///
    /// # Errors
    ///
    /// Returns an error if the tag is not configured or not editable
    pub fn set_value(&mut self, tag: Tag, value: impl Into<String>) -> Result<()> {
        let field = self
            .get_mut(tag)
            .ok_or_else(|| DicatError::UnknownField(tag_key(tag)))?;
        if !field.editable {
            return Err(DicatError::NotEditable(tag_key(tag)));
        }
        field.replacement = Some(value.into());
        Ok(())
    }

    /// Applies `TAG=VALUE` overrides given by the operator
    pub fn apply_overrides<'a, I>(&mut self, overrides: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a (String, String)>,
    {
        for (tag, value) in overrides {
            self.set_value(parse_tag(tag)?, value.as_str())?;
        }
        Ok(())
    }

    /// Current PatientName value, if configured and known
    pub fn patient_name(&self) -> Option<&str> {
        self.get(PATIENT_NAME)
            .and_then(HeaderField::effective_value)
            .map(str::trim)
            .filter(|v| !v.is_empty())
    }

    /// Writes to apply on every anonymized file, in definition order
    pub fn planned_writes(&self) -> Vec<FieldWrite> {
        self.fields.iter().filter_map(HeaderField::planned_write).collect()
    }
}

/// Parses a `TAG=VALUE` argument
pub fn parse_override(s: &str) -> std::result::Result<(String, String), String> {
    let (tag, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected TAG=VALUE, got '{}'", s))?;
    parse_tag(tag).map_err(|e| e.to_string())?;
    Ok((tag.trim().to_string(), value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::tags::{PATIENT_ID, PATIENT_SEX};
    use super::*;

    fn sample_set() -> FieldSet {
        FieldSet::from_fields(vec![
            HeaderField::new(PATIENT_NAME, "PatientName", true),
            HeaderField::new(PATIENT_ID, "PatientID", true),
            HeaderField::new(PATIENT_SEX, "PatientSex", false),
        ])
        .unwrap()
    }

    #[test]
    fn test_duplicate_tag_rejected() {
        let result = FieldSet::from_fields(vec![
            HeaderField::new(PATIENT_NAME, "PatientName", true),
            HeaderField::new(PATIENT_NAME, "Again", false),
        ]);
        assert!(matches!(result, Err(DicatError::FieldDefinition(_))));
    }

    #[test]
    fn test_set_value_editable() {
        let mut set = sample_set();
        set.set_value(PATIENT_NAME, "CANDID001").unwrap();
        assert_eq!(set.patient_name(), Some("CANDID001"));
    }

    #[test]
    fn test_set_value_not_editable() {
        let mut set = sample_set();
        let err = set.set_value(PATIENT_SEX, "F").unwrap_err();
        assert!(matches!(err, DicatError::NotEditable(_)));
    }

    #[test]
    fn test_set_value_unknown() {
        let mut set = sample_set();
        let err = set.set_value(Tag(0x0008, 0x0080), "X").unwrap_err();
        assert!(matches!(err, DicatError::UnknownField(_)));
    }

    #[test]
    fn test_planned_writes() {
        let mut set = sample_set();
        set.set_value(PATIENT_NAME, "CANDID001").unwrap();
        set.get_mut(PATIENT_SEX).unwrap().value = Some("M".to_string());

        // PatientID is editable with no replacement and is left alone
        assert_eq!(
            set.planned_writes(),
            vec![
                FieldWrite::Set(PATIENT_NAME, "CANDID001".to_string()),
                FieldWrite::Blank(PATIENT_SEX),
            ]
        );
    }

    #[test]
    fn test_apply_overrides() {
        let mut set = sample_set();
        let overrides = vec![
            ("0010,0010".to_string(), "SUBJ^01".to_string()),
            ("PatientID".to_string(), "S01".to_string()),
        ];
        set.apply_overrides(&overrides).unwrap();

        assert_eq!(set.patient_name(), Some("SUBJ^01"));
        assert_eq!(
            set.get(PATIENT_ID).unwrap().replacement.as_deref(),
            Some("S01")
        );
    }

    #[test]
    fn test_header_value_is_not_written_back() {
        let mut set = sample_set();
        set.get_mut(PATIENT_NAME).unwrap().value = Some("Doe^Jane".to_string());
        set.get_mut(PATIENT_ID).unwrap().value = Some("ID0001".to_string());
        set.set_value(PATIENT_NAME, "CANDID001").unwrap();

        let writes = set.planned_writes();
        assert!(writes.iter().all(|w| w.tag() != PATIENT_ID));
        assert!(writes.contains(&FieldWrite::Set(PATIENT_NAME, "CANDID001".to_string())));

        let name = set.get(PATIENT_NAME).unwrap();
        assert_eq!(name.value.as_deref(), Some("Doe^Jane"));
        assert_eq!(name.effective_value(), Some("CANDID001"));
    }

    #[test]
    fn test_patient_name_falls_back_to_header_value() {
        let mut set = sample_set();
        set.get_mut(PATIENT_NAME).unwrap().value = Some("Doe^Jane".to_string());
        assert_eq!(set.patient_name(), Some("Doe^Jane"));
    }

    #[test]
    fn test_patient_name_blank_is_none() {
        let mut set = sample_set();
        set.set_value(PATIENT_NAME, "  ").unwrap();
        assert_eq!(set.patient_name(), None);
    }

    #[test]
    fn test_parse_override() {
        assert_eq!(
            parse_override("0010,0010=A=B").unwrap(),
            ("0010,0010".to_string(), "A=B".to_string())
        );
        assert!(parse_override("0010,0010").is_err());
        assert!(parse_override("bogus=1").is_err());
    }

    #[test]
    fn test_default_fields_load() {
        let set = FieldSet::default_fields().unwrap();
        assert!(!set.is_empty());
        assert!(set.get(PATIENT_NAME).unwrap().editable);
    }
}
