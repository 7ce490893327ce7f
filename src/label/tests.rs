use super::*;

use crate::model::OcrLabelResult;

fn map(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
    entries
        .iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect()
}

fn label(subject_name: &str, confidence: f64, entries: &[(&str, &str)]) -> LabelInput {
    LabelInput {
        page_num: 12,
        caption: format!("{subject_name} 中文标签"),
        subject_name: subject_name.to_string(),
        ocr: Some(OcrLabelResult {
            structured_data: map(entries),
            confidence,
        }),
    }
}

fn checker() -> ThirdPageChecker {
    ThirdPageChecker::new(&AuditConfig::default()).expect("checker should build")
}

#[test]
fn table_field_names_map_to_label_fields() {
    assert_eq!(
        LabelField::from_table_field_name("规格 型号"),
        Some(LabelField::ModelSpec)
    );
    assert_eq!(
        LabelField::from_table_field_name("MFG"),
        Some(LabelField::ProductionDate)
    );
    assert_eq!(
        LabelField::from_table_field_name("产品编号/批号"),
        Some(LabelField::SerialOrBatch)
    );
    assert_eq!(LabelField::from_table_field_name("委托方"), None);
    assert_eq!(LabelField::from_table_field_name(""), None);
}

#[test]
fn label_values_resolve_through_synonyms() {
    let data = map(&[
        ("Model", "ECG-100"),
        ("MFG Date", "2024.01.02"),
        ("serial_number", "SN2024001"),
    ]);

    assert_eq!(
        resolve_label_value(LabelField::ModelSpec, &data).as_deref(),
        Some("ECG-100")
    );
    assert_eq!(
        resolve_label_value(LabelField::ProductionDate, &data).as_deref(),
        Some("2024.01.02")
    );
    assert_eq!(
        resolve_label_value(LabelField::SerialOrBatch, &data).as_deref(),
        Some("SN2024001")
    );
}

#[test]
fn exact_label_key_beats_containment() {
    let data = map(&[("型号说明", "见说明书"), ("规格", "ECG-200")]);

    assert_eq!(
        resolve_label_value(LabelField::ModelSpec, &data).as_deref(),
        Some("ECG-200")
    );
}

#[test]
fn blank_label_values_do_not_resolve() {
    let data = map(&[("型号", "  ")]);
    assert_eq!(resolve_label_value(LabelField::ModelSpec, &data), None);
}

#[test]
fn date_formats_are_detected_by_prefix() {
    let detector = DateFormatDetector::new().expect("detector should build");

    assert_eq!(detector.detect("2024.01.02"), Some(DateFormat::YmdDot));
    assert_eq!(detector.detect("2024/1/2"), Some(DateFormat::YmdSlash));
    assert_eq!(detector.detect("2024年1月2日"), Some(DateFormat::YmdChinese));
    assert_eq!(detector.detect("2024年1月"), Some(DateFormat::YmChinese));
    assert_eq!(detector.detect(" 2024-01 "), Some(DateFormat::YmDash));
    assert_eq!(detector.detect("Jan 2024"), None);
    assert_eq!(detector.detect(""), None);
}

#[test]
fn identical_references_need_no_label() {
    let fields = map(&[
        ("型号规格", "见“样品描述”栏"),
        ("生产日期", "见“样品描述”栏"),
        ("产品编号/批号", "见“样品描述”栏"),
    ]);

    let result = checker().check(&fields, &[]);

    assert_eq!(result.comparisons.len(), 3);
    assert!(result.comparisons.iter().all(|comparison| comparison.is_match));
    assert!(result.errors.is_empty());
}

#[test]
fn inconsistent_references_are_reported_once() {
    let fields = map(&[
        ("型号规格", "见“样品描述”栏"),
        ("生产日期", "见样品描述栏"),
    ]);

    let result = checker().check(&fields, &[]);

    assert_eq!(result.errors.len(), 1);
    assert_eq!(
        result.errors[0].error_code,
        FindingCode::ThirdPageFieldMismatch
    );
    assert!(result.comparisons.iter().all(|comparison| !comparison.is_match));
}

#[test]
fn matching_label_confirms_fields() {
    let fields = map(&[
        ("样品名称", "心电监护仪"),
        ("型号规格", "ECG-100"),
        ("产品编号/批号", "SN2024001"),
    ]);
    let labels = vec![label(
        "心电监护仪 主机",
        0.9,
        &[("型号", "ECG-100"), ("SN", "SN2024001A")],
    )];

    let result = checker().check(&fields, &labels);

    assert_eq!(result.comparisons.len(), 2);
    assert!(result.comparisons.iter().all(|comparison| comparison.is_match));
    assert!(result.errors.is_empty());
}

#[test]
fn differing_model_is_a_field_mismatch() {
    let fields = map(&[("样品名称", "心电监护仪"), ("型号规格", "ECG-100")]);
    let labels = vec![label("心电监护仪", 0.9, &[("型号", "ECG-300")])];

    let result = checker().check(&fields, &labels);

    assert_eq!(result.errors.len(), 1);
    assert_eq!(
        result.errors[0].error_code,
        FindingCode::ThirdPageFieldMismatch
    );
    assert_eq!(result.comparisons[0].ocr_value, "ECG-300");
    assert_eq!(result.comparisons[0].issue_type.as_deref(), Some("mismatch"));
}

#[test]
fn date_layout_difference_is_a_format_error() {
    let fields = map(&[("样品名称", "心电监护仪"), ("生产日期", "2024.01.02")]);
    let labels = vec![label("心电监护仪", 0.9, &[("MFG", "2024-01-02")])];

    let result = checker().check(&fields, &labels);

    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].error_code, FindingCode::DateFormatMismatch);
    assert!(!result.comparisons[0].is_match);
    assert_eq!(
        result.comparisons[0].issue_type.as_deref(),
        Some("date_format")
    );
}

#[test]
fn most_frequent_label_value_wins() {
    let fields = map(&[("样品名称", "心电监护仪"), ("型号规格", "ECG-200")]);
    let labels = vec![
        label("心电监护仪", 0.9, &[("型号", "ECG-100")]),
        label("心电监护仪", 0.9, &[("型号", "ECG-200")]),
        label("心电监护仪", 0.9, &[("型号", "ECG-200")]),
    ];

    let result = checker().check(&fields, &labels);

    assert_eq!(result.comparisons[0].ocr_value, "ECG-200");
    assert!(result.errors.is_empty());
}

#[test]
fn labels_for_other_samples_are_ignored() {
    let fields = map(&[("样品名称", "心电监护仪"), ("型号规格", "ECG-100")]);
    let labels = vec![label("血压计", 0.9, &[("型号", "BP-1")])];

    let result = checker().check(&fields, &labels);

    assert!(result.comparisons.is_empty());
    assert!(result.errors.is_empty());
}

#[test]
fn low_confidence_labels_are_skipped() {
    let config = AuditConfig {
        min_label_confidence: 0.5,
        ..AuditConfig::default()
    };
    let checker = ThirdPageChecker::new(&config).expect("checker should build");
    let fields = map(&[("样品名称", "心电监护仪"), ("型号规格", "ECG-100")]);
    let labels = vec![label("心电监护仪", 0.2, &[("型号", "ECG-999")])];

    let result = checker.check(&fields, &labels);

    assert!(result.errors.is_empty());
    assert!(result.comparisons.is_empty());
}

#[test]
fn fields_without_letters_are_not_compared() {
    let fields = map(&[("样品名称", "心电监护仪"), ("型号规格", "100")]);
    let labels = vec![label("心电监护仪", 0.9, &[("型号", "200")])];

    assert!(checker().check(&fields, &labels).comparisons.is_empty());
}

#[test]
fn no_fixed_value_markers_are_equivalent() {
    assert!(values_equal("/", ""));
    assert!(values_equal(" 见实物 ", "/"));
    assert!(values_equal("某医院", "某医院 "));
    assert!(!values_equal("某医院", "/"));
}

#[test]
fn home_and_summary_pages_are_compared_per_key() {
    let home = map(&[("委 托 方", "某医院"), ("样品名称", "心电监护仪"), ("型号规格", "/")]);
    let third = map(&[("委托方", "某医院"), ("样品名称", "血压计"), ("型号规格", "见实物")]);
    let keys = AuditConfig::default().home_third_fields;

    let comparisons = compare_home_third(&home, &third, &keys);
    let findings = home_third_findings(&comparisons);

    assert_eq!(comparisons.len(), 3);
    assert!(comparisons[0].is_match);
    assert!(!comparisons[1].is_match);
    assert!(comparisons[2].is_match);
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].error_code, FindingCode::HomeThirdMismatch);
    assert_eq!(findings[0].details.expected.as_deref(), Some("心电监护仪"));
    assert_eq!(findings[0].details.actual.as_deref(), Some("血压计"));
}
