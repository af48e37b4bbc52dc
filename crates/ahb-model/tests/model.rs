use ahb_model::{AhbField, AhbRow, FieldName, FormatVersion, RowComparison, RowDiff};

#[test]
fn format_version_round_trips_through_serde() {
    let fv = FormatVersion::parse("FV2504").expect("parse");
    let json = serde_json::to_string(&fv).expect("serialize");
    assert_eq!(json, "\"FV2504\"");
    let back: FormatVersion = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(back, fv);
    assert!(serde_json::from_str::<FormatVersion>("\"FV2599\"").is_err());
}

#[test]
fn field_names_deserialize_known_and_extra() {
    let names: Vec<FieldName> =
        serde_json::from_str(r#"["segment_code","Hinweis"]"#).expect("deserialize");
    assert_eq!(names[0], FieldName::Known(AhbField::SegmentCode));
    assert_eq!(names[1], FieldName::Extra("Hinweis".to_string()));
}

#[test]
fn display_section_name_prefers_previous_side() {
    let added = RowComparison {
        previous: AhbRow::empty("FV2504"),
        diff: RowDiff::added(),
        subsequent: AhbRow::new("FV2504", "Referenz"),
    };
    assert_eq!(added.display_section_name(), "Referenz");

    let removed = RowComparison {
        previous: AhbRow::new("FV2410", "Kopf"),
        diff: RowDiff::removed(),
        subsequent: AhbRow::empty("FV2410"),
    };
    assert_eq!(removed.display_section_name(), "Kopf");
}
