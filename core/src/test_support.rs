use crate::fields::tags::{
    PATIENT_BIRTH_DATE, PATIENT_ID, PATIENT_NAME, SOP_CLASS_UID, SOP_INSTANCE_UID,
};
use dicom_core::{DataElement, PrimitiveValue, VR};
use dicom_object::{FileMetaTableBuilder, InMemDicomObject};
use std::path::Path;

const SECONDARY_CAPTURE: &str = "1.2.840.10008.5.1.4.1.1.7";
const EXPLICIT_VR_LE: &str = "1.2.840.10008.1.2.1";

/// Writes a small DICOM file with patient fields filled in
pub(crate) fn write_test_dicom(path: &Path, patient_name: &str, patient_id: &str) {
    let instance_uid = "1.2.826.0.1.3680043.2.1125.1";
    let dcm = InMemDicomObject::from_element_iter([
        DataElement::new(SOP_CLASS_UID, VR::UI, PrimitiveValue::from(SECONDARY_CAPTURE)),
        DataElement::new(SOP_INSTANCE_UID, VR::UI, PrimitiveValue::from(instance_uid)),
        DataElement::new(PATIENT_NAME, VR::PN, PrimitiveValue::from(patient_name)),
        DataElement::new(PATIENT_ID, VR::LO, PrimitiveValue::from(patient_id)),
        DataElement::new(PATIENT_BIRTH_DATE, VR::DA, PrimitiveValue::from("19700101")),
    ]);

    let file = dcm
        .with_meta(
            FileMetaTableBuilder::new()
                .media_storage_sop_class_uid(SECONDARY_CAPTURE)
                .media_storage_sop_instance_uid(instance_uid)
                .transfer_syntax(EXPLICIT_VR_LE),
        )
        .unwrap();
    file.write_to_file(path).unwrap();
}
