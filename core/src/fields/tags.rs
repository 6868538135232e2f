use crate::error::{DicatError, Result};
use dicom_core::dictionary::{DataDictionary, DataDictionaryEntry};
use dicom_core::Tag;
use dicom_dictionary_std::StandardDataDictionary;
use dicom_object::InMemDicomObject;

// Patient Tags
pub const PATIENT_NAME: Tag = Tag(0x0010, 0x0010);
pub const PATIENT_ID: Tag = Tag(0x0010, 0x0020);
pub const PATIENT_BIRTH_DATE: Tag = Tag(0x0010, 0x0030);
pub const PATIENT_SEX: Tag = Tag(0x0010, 0x0040);

// Study Identification Tags
pub const ACCESSION_NUMBER: Tag = Tag(0x0008, 0x0050);
pub const INSTITUTION_NAME: Tag = Tag(0x0008, 0x0080);
pub const SOP_CLASS_UID: Tag = Tag(0x0008, 0x0016);
pub const SOP_INSTANCE_UID: Tag = Tag(0x0008, 0x0018);

/// Group of the file meta information, never rewritten
const META_GROUP: u16 = 0x0002;

/// Parses a tag identifier
///
/// Accepts `GGGG,EEEE`, `(GGGG,EEEE)`, `GGGGEEEE` or a standard
/// dictionary keyword such as `PatientName`.
pub fn parse_tag(s: &str) -> Result<Tag> {
    let trimmed = s.trim();
    let inner = trimmed
        .strip_prefix('(')
        .and_then(|t| t.strip_suffix(')'))
        .unwrap_or(trimmed);

    if let Some((group, element)) = inner.split_once(',') {
        return Ok(Tag(parse_hex_part(group, s)?, parse_hex_part(element, s)?));
    }

    if inner.len() == 8 && inner.chars().all(|c| c.is_ascii_hexdigit()) {
        return Ok(Tag(
            parse_hex_part(&inner[0..4], s)?,
            parse_hex_part(&inner[4..8], s)?,
        ));
    }

    StandardDataDictionary
        .by_name(inner)
        .map(|entry| entry.tag())
        .ok_or_else(|| DicatError::InvalidTag(s.to_string()))
}

fn parse_hex_part(part: &str, original: &str) -> Result<u16> {
    let part = part.trim();
    if part.len() != 4 {
        return Err(DicatError::InvalidTag(original.to_string()));
    }
    u16::from_str_radix(part, 16).map_err(|_| DicatError::InvalidTag(original.to_string()))
}

/// Whether a tag belongs to the file meta group
pub fn is_meta_tag(tag: Tag) -> bool {
    tag.group() == META_GROUP
}

/// Formats a tag as `gggg,eeee`, the form used in definition files
pub fn tag_key(tag: Tag) -> String {
    format!("{:04x},{:04x}", tag.group(), tag.element())
}

/// Helper to get string value from DICOM tag
///
/// Returns `None` if the tag is not present or cannot be converted to string
pub fn get_string_value(dcm: &InMemDicomObject, tag: Tag) -> Option<String> {
    dcm.element(tag)
        .ok()
        .and_then(|elem| elem.to_str().ok())
        .map(|s| s.trim().to_string())
}
