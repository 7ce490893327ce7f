use super::*;

/// Values meaning "no fixed value" on the first page and the summary page.
const NO_FIXED_VALUE: [&str; 3] = ["", "/", "见实物"];
const QUOTE_CHARS: [char; 7] = ['"', '“', '”', '「', '」', '『', '』'];

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
pub enum DateFormat {
    #[serde(rename = "YYYY.MM.DD")]
    YmdDot,
    #[serde(rename = "YYYY/MM/DD")]
    YmdSlash,
    #[serde(rename = "YYYY-MM-DD")]
    YmdDash,
    #[serde(rename = "YYYY年MM月DD日")]
    YmdChinese,
    #[serde(rename = "YYYY.MM")]
    YmDot,
    #[serde(rename = "YYYY/MM")]
    YmSlash,
    #[serde(rename = "YYYY-MM")]
    YmDash,
    #[serde(rename = "YYYY年MM月")]
    YmChinese,
}

impl DateFormat {
    pub fn name(self) -> &'static str {
        match self {
            DateFormat::YmdDot => "YYYY.MM.DD",
            DateFormat::YmdSlash => "YYYY/MM/DD",
            DateFormat::YmdDash => "YYYY-MM-DD",
            DateFormat::YmdChinese => "YYYY年MM月DD日",
            DateFormat::YmDot => "YYYY.MM",
            DateFormat::YmSlash => "YYYY/MM",
            DateFormat::YmDash => "YYYY-MM",
            DateFormat::YmChinese => "YYYY年MM月",
        }
    }
}

/// Prefix-anchored date layouts, day-precision layouts first.
#[derive(Debug)]
pub struct DateFormatDetector {
    patterns: Vec<(DateFormat, Regex)>,
}

impl DateFormatDetector {
    pub fn new() -> Result<Self> {
        let specs = [
            (DateFormat::YmdDot, r"^\d{4}\.\d{1,2}\.\d{1,2}"),
            (DateFormat::YmdSlash, r"^\d{4}/\d{1,2}/\d{1,2}"),
            (DateFormat::YmdDash, r"^\d{4}-\d{1,2}-\d{1,2}"),
            (DateFormat::YmdChinese, r"^\d{4}年\d{1,2}月\d{1,2}日"),
            (DateFormat::YmDot, r"^\d{4}\.\d{1,2}"),
            (DateFormat::YmSlash, r"^\d{4}/\d{1,2}"),
            (DateFormat::YmDash, r"^\d{4}-\d{1,2}"),
            (DateFormat::YmChinese, r"^\d{4}年\d{1,2}月"),
        ];

        let patterns = specs
            .into_iter()
            .map(|(format, pattern)| {
                Regex::new(pattern)
                    .with_context(|| format!("failed to compile date pattern {}", format.name()))
                    .map(|regex| (format, regex))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { patterns })
    }

    pub fn detect(&self, value: &str) -> Option<DateFormat> {
        let value = value.trim();
        if value.is_empty() {
            return None;
        }

        self.patterns
            .iter()
            .find(|(_, regex)| regex.is_match(value))
            .map(|(format, _)| *format)
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ThirdPageCheckResult {
    pub comparisons: Vec<FieldComparison>,
    pub errors: Vec<ErrorItem>,
}

#[derive(Debug, Clone, PartialEq)]
struct ExtendedField {
    field: LabelField,
    value: String,
}

/// Checks the summary page's extended fields against the OCR of the
/// product labels photographed for the same sample.
#[derive(Debug)]
pub struct ThirdPageChecker {
    min_label_confidence: f64,
    dates: DateFormatDetector,
}

impl ThirdPageChecker {
    pub fn new(config: &AuditConfig) -> Result<Self> {
        Ok(Self {
            min_label_confidence: config.min_label_confidence,
            dates: DateFormatDetector::new()?,
        })
    }

    pub fn check(
        &self,
        third_page_fields: &BTreeMap<String, String>,
        labels: &[LabelInput],
    ) -> ThirdPageCheckResult {
        let extended = extract_extended_fields(third_page_fields);
        if extended.is_empty() {
            debug!("summary page carries no extended fields");
            return ThirdPageCheckResult::default();
        }

        if extended
            .iter()
            .all(|field| is_sample_description_reference(&field.value))
        {
            return check_reference_consistency(&extended);
        }

        let sample_name = lookup_field(third_page_fields, SAMPLE_NAME_FIELD).unwrap_or_default();
        let matched = self.labels_for_sample(sample_name, labels);
        if matched.is_empty() {
            info!(sample = %sample_name, "no product label matches the sample name");
            return ThirdPageCheckResult::default();
        }

        let mut result = ThirdPageCheckResult::default();
        for field in &extended {
            if is_sample_description_reference(&field.value) || !needs_label_check(field) {
                continue;
            }

            let (comparison, error) = self.check_field(field, &matched);
            result.comparisons.push(comparison);
            result.errors.extend(error);
        }

        info!(
            labels = matched.len(),
            compared = result.comparisons.len(),
            errors = result.errors.len(),
            "summary page cross-check complete"
        );
        result
    }

    fn labels_for_sample<'a>(
        &self,
        sample_name: &str,
        labels: &'a [LabelInput],
    ) -> Vec<&'a LabelInput> {
        let sample = strip_whitespace(sample_name);
        if sample.is_empty() {
            return Vec::new();
        }

        labels
            .iter()
            .filter(|label| {
                let subject = strip_whitespace(&label.subject_name);
                !subject.is_empty()
                    && (subject.contains(sample.as_str()) || sample.contains(subject.as_str()))
            })
            .filter(|label| match &label.ocr {
                Some(ocr) if ocr.confidence < self.min_label_confidence => {
                    warn!(
                        page = label.page_num,
                        caption = %label.caption,
                        confidence = ocr.confidence,
                        "skipping low-confidence label"
                    );
                    false
                }
                Some(_) => true,
                None => false,
            })
            .collect()
    }

    fn check_field(
        &self,
        field: &ExtendedField,
        labels: &[&LabelInput],
    ) -> (FieldComparison, Option<ErrorItem>) {
        let label_values = labels
            .iter()
            .filter_map(|label| label.ocr.as_ref())
            .filter_map(|ocr| resolve_label_value(field.field, &ocr.structured_data))
            .collect::<Vec<String>>();
        let label_value = most_frequent(&label_values).unwrap_or_default();

        let mut is_match = label_values_match(field.field, &field.value, &label_value);
        let mut error = None;

        if field.field == LabelField::ProductionDate
            && !field.value.is_empty()
            && !label_value.is_empty()
            && let Some(table_format) = self.dates.detect(&field.value)
            && let Some(label_format) = label_values.iter().find_map(|value| self.dates.detect(value))
            && table_format != label_format
        {
            is_match = false;
            error = Some(
                ErrorItem::error(
                    FindingCode::DateFormatMismatch,
                    format!(
                        "生产日期格式不一致：表格为“{}”，标签为“{}”",
                        table_format.name(),
                        label_format.name()
                    ),
                )
                .at_page(THIRD_PAGE_NUM)
                .at_location(format!("第三页表格/{}", field.field.display_name()))
                .with_details(FindingDetails {
                    field_name: Some(field.field.display_name().to_string()),
                    expected: Some(table_format.name().to_string()),
                    actual: Some(label_format.name().to_string()),
                    values: vec![field.value.clone(), label_value.clone()],
                    ..FindingDetails::default()
                }),
            );
        }

        if !is_match && error.is_none() {
            error = Some(
                ErrorItem::error(
                    FindingCode::ThirdPageFieldMismatch,
                    format!(
                        "第三页字段“{}”与标签不一致：表格“{}”，标签“{}”",
                        field.field.display_name(),
                        field.value,
                        label_value
                    ),
                )
                .at_page(THIRD_PAGE_NUM)
                .at_location(format!("第三页表格/{}", field.field.display_name()))
                .with_details(FindingDetails {
                    field_name: Some(field.field.display_name().to_string()),
                    expected: Some(field.value.clone()),
                    actual: Some(label_value.clone()),
                    values: label_values.clone(),
                    ..FindingDetails::default()
                }),
            );
        }

        let issue_type = match &error {
            Some(error) if error.error_code == FindingCode::DateFormatMismatch => Some("date_format"),
            Some(_) => Some("mismatch"),
            None => None,
        };

        let comparison = FieldComparison {
            field_name: field.field.display_name().to_string(),
            table_value: field.value.clone(),
            ocr_value: label_value,
            is_match,
            issue_type: issue_type.map(str::to_string),
            page_num: Some(THIRD_PAGE_NUM),
        };

        (comparison, error)
    }
}

/// First summary-table value per extended field, in field order.
fn extract_extended_fields(fields: &BTreeMap<String, String>) -> Vec<ExtendedField> {
    let mut found = BTreeMap::<usize, ExtendedField>::new();

    for (name, value) in fields {
        let Some(field) = LabelField::from_table_field_name(name) else {
            continue;
        };
        let position = field as usize;
        found.entry(position).or_insert_with(|| ExtendedField {
            field,
            value: value.trim().to_string(),
        });
    }

    found.into_values().collect()
}

fn is_sample_description_reference(value: &str) -> bool {
    let cleaned = value
        .trim()
        .chars()
        .filter(|ch| !QUOTE_CHARS.contains(ch))
        .collect::<String>();

    cleaned.contains('见') && cleaned.contains("样品描述") && cleaned.contains('栏')
}

/// Production dates rarely carry letters, so a digit is enough; the other
/// fields are checked only when they mix digits and ASCII letters.
fn needs_label_check(field: &ExtendedField) -> bool {
    let has_digit = field.value.chars().any(|ch| ch.is_ascii_digit());
    let has_letter = field.value.chars().any(|ch| ch.is_ascii_alphabetic());

    match field.field {
        LabelField::ProductionDate => has_digit,
        LabelField::ModelSpec | LabelField::SerialOrBatch => has_digit && has_letter,
    }
}

fn check_reference_consistency(extended: &[ExtendedField]) -> ThirdPageCheckResult {
    let values = extended
        .iter()
        .map(|field| field.value.clone())
        .collect::<Vec<String>>();
    let all_same = values.windows(2).all(|pair| pair[0] == pair[1]);

    let comparisons = extended
        .iter()
        .map(|field| FieldComparison {
            field_name: field.field.display_name().to_string(),
            table_value: field.value.clone(),
            ocr_value: field.value.clone(),
            is_match: all_same,
            issue_type: (!all_same).then(|| "inconsistent_reference".to_string()),
            page_num: Some(THIRD_PAGE_NUM),
        })
        .collect();

    let errors = if all_same {
        Vec::new()
    } else {
        vec![
            ErrorItem::error(
                FindingCode::ThirdPageFieldMismatch,
                "第三页扩展字段引用不一致：应统一为“见“样品描述”栏”".to_string(),
            )
            .at_page(THIRD_PAGE_NUM)
            .at_location("第三页表格".to_string())
            .with_details(FindingDetails {
                values,
                ..FindingDetails::default()
            }),
        ]
    };

    ThirdPageCheckResult {
        comparisons,
        errors,
    }
}

/// Most frequent value; the earliest one wins a tie.
fn most_frequent(values: &[String]) -> Option<String> {
    let mut counts = Vec::<(&str, usize)>::new();
    for value in values {
        match counts.iter_mut().find(|(seen, _)| *seen == value.as_str()) {
            Some((_, count)) => *count += 1,
            None => counts.push((value.as_str(), 1)),
        }
    }

    let mut best: Option<(&str, usize)> = None;
    for (value, count) in counts {
        if best.is_none_or(|(_, best_count)| count > best_count) {
            best = Some((value, count));
        }
    }

    best.map(|(value, _)| value.to_string())
}

fn label_values_match(field: LabelField, table_value: &str, label_value: &str) -> bool {
    let table = strip_whitespace(table_value);
    let label = strip_whitespace(label_value);

    if table == label {
        return true;
    }

    field == LabelField::SerialOrBatch
        && !table.is_empty()
        && !label.is_empty()
        && (table.contains(label.as_str()) || label.contains(table.as_str()))
}

/// Whitespace-insensitive key lookup.
fn lookup_field<'a>(fields: &'a BTreeMap<String, String>, name: &str) -> Option<&'a str> {
    let wanted = strip_whitespace(name);
    fields
        .iter()
        .find(|(key, _)| strip_whitespace(key) == wanted)
        .map(|(_, value)| value.as_str())
}

/// Equal after trimming, or both "no fixed value" markers.
pub fn values_equal(first: &str, second: &str) -> bool {
    let first = first.trim();
    let second = second.trim();

    first == second || (NO_FIXED_VALUE.contains(&first) && NO_FIXED_VALUE.contains(&second))
}

/// Compares the configured metadata keys between the first page and the
/// summary page.
pub fn compare_home_third(
    home: &BTreeMap<String, String>,
    third: &BTreeMap<String, String>,
    keys: &[String],
) -> Vec<FieldComparison> {
    keys.iter()
        .map(|key| {
            let home_value = lookup_field(home, key).unwrap_or_default().trim();
            let third_value = lookup_field(third, key).unwrap_or_default().trim();
            let is_match = values_equal(home_value, third_value);

            FieldComparison {
                field_name: key.clone(),
                table_value: home_value.to_string(),
                ocr_value: third_value.to_string(),
                is_match,
                issue_type: (!is_match).then(|| "mismatch".to_string()),
                page_num: None,
            }
        })
        .collect()
}

pub fn home_third_findings(comparisons: &[FieldComparison]) -> Vec<ErrorItem> {
    comparisons
        .iter()
        .filter(|comparison| !comparison.is_match)
        .map(|comparison| {
            ErrorItem::error(
                FindingCode::HomeThirdMismatch,
                format!("首页与第三页“{}”不一致", comparison.field_name),
            )
            .at_page(1)
            .at_location("首页/第三页".to_string())
            .with_details(FindingDetails {
                field_name: Some(comparison.field_name.clone()),
                expected: Some(comparison.table_value.clone()),
                actual: Some(comparison.ocr_value.clone()),
                ..FindingDetails::default()
            })
        })
        .collect()
}
