use super::HeaderTool;
use crate::error::Result;
use crate::fields::tags::{get_string_value, is_meta_tag, tag_key};
use crate::fields::{FieldSet, FieldWrite};
use dicom_core::value::C;
use dicom_core::{DataElement, PrimitiveValue, VR};
use dicom_object::{open_file, InMemDicomObject};
use log::{debug, warn};
use std::path::Path;
use std::str::FromStr;

/// Header tool backed by dicom-rs
#[derive(Debug, Clone, Copy, Default)]
pub struct LibraryTool;

impl HeaderTool for LibraryTool {
    fn name(&self) -> &'static str {
        "dicom-rs"
    }

    fn read_values(&self, file: &Path, fields: &mut FieldSet) -> Result<()> {
        let dcm = open_file(file)?;
        read_into(&dcm, fields);
        Ok(())
    }

    fn write_fields(&self, file: &Path, fields: &FieldSet) -> Result<usize> {
        let mut dcm = open_file(file)?;
        let changed = apply_writes(&mut dcm, &fields.planned_writes());
        if changed > 0 {
            dcm.write_to_file(file)?;
        }
        debug!("Rewrote {} elements in {}", changed, file.display());
        Ok(changed)
    }
}

/// Copies the value of every configured tag present in `dcm`
pub fn read_into(dcm: &InMemDicomObject, fields: &mut FieldSet) {
    for field in fields.iter_mut() {
        match get_string_value(dcm, field.tag) {
            Some(value) => field.value = Some(value),
            None => debug!("Skipping {} ({}): not readable", tag_key(field.tag), field.description),
        }
    }
}

/// Converts an operator string into a value of the element's VR
///
/// Numeric VRs take backslash-separated numbers. Binary VRs such as
/// OB, OW, UN and AT cannot be set from text and yield `None`.
pub fn typed_value(vr: VR, value: &str) -> Option<PrimitiveValue> {
    match vr {
        VR::AE | VR::AS | VR::CS | VR::DA | VR::DS | VR::DT | VR::IS | VR::LO | VR::LT
        | VR::PN | VR::SH | VR::ST | VR::TM | VR::UC | VR::UI | VR::UR | VR::UT => {
            Some(PrimitiveValue::from(value))
        }
        VR::US => parse_numbers(value).map(PrimitiveValue::U16),
        VR::SS => parse_numbers(value).map(PrimitiveValue::I16),
        VR::UL => parse_numbers(value).map(PrimitiveValue::U32),
        VR::SL => parse_numbers(value).map(PrimitiveValue::I32),
        VR::UV => parse_numbers(value).map(PrimitiveValue::U64),
        VR::SV => parse_numbers(value).map(PrimitiveValue::I64),
        VR::FL => parse_numbers(value).map(PrimitiveValue::F32),
        VR::FD => parse_numbers(value).map(PrimitiveValue::F64),
        _ => None,
    }
}

fn parse_numbers<T: FromStr>(value: &str) -> Option<C<T>> {
    value
        .split('\\')
        .map(|part| part.trim().parse::<T>().ok())
        .collect()
}

/// Applies writes to elements already present in `dcm`
///
/// Elements keep their VR. Missing elements, sequences, file meta tags
/// and values that do not fit the VR are left untouched. Returns the
/// number of modified elements.
pub fn apply_writes(dcm: &mut InMemDicomObject, writes: &[FieldWrite]) -> usize {
    let mut changed = 0;
    for write in writes {
        let tag = write.tag();
        if is_meta_tag(tag) {
            warn!("Refusing to modify file meta tag {}", tag_key(tag));
            continue;
        }

        let vr = match dcm.element(tag) {
            Ok(elem) => elem.vr(),
            Err(_) => continue,
        };
        if vr == VR::SQ {
            warn!("Skipping sequence {}", tag_key(tag));
            continue;
        }

        let value = match write {
            FieldWrite::Blank(_) => PrimitiveValue::Empty,
            FieldWrite::Set(_, v) => match typed_value(vr, v) {
                Some(value) => value,
                None => {
                    warn!("Skipping {}: '{}' is not a valid {:?} value", tag_key(tag), v, vr);
                    continue;
                }
            },
        };
        dcm.put(DataElement::new(tag, vr, value));
        changed += 1;
    }
    changed
}
