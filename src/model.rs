use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// One table as handed over by the PDF/DOCX table extractor.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TableData {
    pub page_num: u32,
    #[serde(default)]
    pub table_index: usize,
    pub headers: Vec<String>,
    #[serde(default, deserialize_with = "deserialize_cells")]
    pub rows: Vec<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageInput {
    pub page_num: u32,
    #[serde(default)]
    pub page_header: Option<String>,
    #[serde(default)]
    pub text_content: Option<String>,
    #[serde(default)]
    pub tables: Vec<TableData>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OcrLabelResult {
    #[serde(default)]
    pub structured_data: BTreeMap<String, String>,
    #[serde(default)]
    pub confidence: f64,
}

/// A product-label photograph with its caption and recognized fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LabelInput {
    pub page_num: u32,
    #[serde(default)]
    pub caption: String,
    #[serde(default)]
    pub subject_name: String,
    #[serde(default)]
    pub ocr: Option<OcrLabelResult>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractedDocument {
    #[serde(default)]
    pub filename: Option<String>,
    pub pages: Vec<PageInput>,
    #[serde(default)]
    pub home_fields: BTreeMap<String, String>,
    #[serde(default)]
    pub third_page_fields: BTreeMap<String, String>,
    #[serde(default)]
    pub labels: Vec<LabelInput>,
}

fn deserialize_cells<'de, D>(deserializer: D) -> Result<Vec<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Vec::<Vec<Option<String>>>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .map(|row| row.into_iter().map(Option::unwrap_or_default).collect())
        .collect())
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
pub enum ErrorLevel {
    #[serde(rename = "ERROR")]
    Error,
    #[serde(rename = "WARN")]
    Warn,
    #[serde(rename = "INFO")]
    Info,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum FindingCode {
    ConclusionShouldBeNa,
    ConclusionShouldBePass,
    ConclusionShouldBeFail,
    ConclusionShouldNotBeFail,
    ConclusionConflict,
    EmptyInspectionResult,
    EmptyConclusion,
    EmptyRemark,
    SerialNotContinuous,
    SerialEmpty,
    ContinuationMarkMissing,
    ContinuationMarkWrongPosition,
    ThirdPageFieldMismatch,
    DateFormatMismatch,
    HomeThirdMismatch,
    PageNumberDiscontinuous,
    PageNumberLastMismatch,
    PageNumberTotalMismatch,
    InspectionSummary,
    ThirdPageFieldMatched,
}

impl FindingCode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ConclusionShouldBeNa => "CONCLUSION_MISMATCH_001",
            Self::ConclusionShouldBePass => "CONCLUSION_MISMATCH_002",
            Self::ConclusionShouldBeFail => "CONCLUSION_MISMATCH_003",
            Self::ConclusionShouldNotBeFail => "CONCLUSION_MISMATCH_004",
            Self::ConclusionConflict => "CONCLUSION_CONFLICT_001",
            Self::EmptyInspectionResult => "EMPTY_INSPECTION_RESULT",
            Self::EmptyConclusion => "EMPTY_CONCLUSION",
            Self::EmptyRemark => "EMPTY_REMARK",
            Self::SerialNotContinuous => "SERIAL_NOT_CONTINUOUS",
            Self::SerialEmpty => "SERIAL_EMPTY",
            Self::ContinuationMarkMissing => "CONTINUATION_MARK_MISSING",
            Self::ContinuationMarkWrongPosition => "CONTINUATION_MARK_WRONG_POSITION",
            Self::ThirdPageFieldMismatch => "THIRD_PAGE_FIELD_ERROR_001",
            Self::DateFormatMismatch => "DATE_FORMAT_ERROR_001",
            Self::HomeThirdMismatch => "HOME_THIRD_MISMATCH_001",
            Self::PageNumberDiscontinuous => "PAGE_NUMBER_ERROR_001",
            Self::PageNumberLastMismatch => "PAGE_NUMBER_ERROR_002",
            Self::PageNumberTotalMismatch => "PAGE_NUMBER_ERROR_003",
            Self::InspectionSummary => "INSPECTION_SUMMARY",
            Self::ThirdPageFieldMatched => "THIRD_PAGE_FIELD_MATCHED",
        }
    }
}

impl Serialize for FindingCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Context attached to a finding. Only the fields relevant to the finding
/// kind are populated.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FindingDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row_index: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clause_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_item_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_first_row: Option<bool>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorItem {
    pub level: ErrorLevel,
    pub error_code: FindingCode,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_num: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub details: FindingDetails,
}

impl ErrorItem {
    pub fn error(code: FindingCode, message: String) -> Self {
        Self::new(ErrorLevel::Error, code, message)
    }

    pub fn warn(code: FindingCode, message: String) -> Self {
        Self::new(ErrorLevel::Warn, code, message)
    }

    pub fn info(code: FindingCode, message: String) -> Self {
        Self::new(ErrorLevel::Info, code, message)
    }

    fn new(level: ErrorLevel, error_code: FindingCode, message: String) -> Self {
        Self {
            level,
            error_code,
            message,
            page_num: None,
            location: None,
            details: FindingDetails::default(),
        }
    }

    pub fn at_page(mut self, page_num: u32) -> Self {
        self.page_num = Some(page_num);
        self
    }

    pub fn at_location(mut self, location: String) -> Self {
        self.location = Some(location);
        self
    }

    pub fn with_details(mut self, details: FindingDetails) -> Self {
        self.details = details;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldComparison {
    pub field_name: String,
    pub table_value: String,
    pub ocr_value: String,
    pub is_match: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issue_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_num: Option<u32>,
}
