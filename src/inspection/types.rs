use super::*;

use serde::Serializer;

/// The seven logical columns of an inspection-item table, in nominal order.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ColumnName {
    ItemNumber,
    ItemName,
    ClauseNumber,
    Requirement,
    InspectionResult,
    Conclusion,
    Remark,
}

impl ColumnName {
    pub const ALL: [ColumnName; NOMINAL_COLUMN_COUNT] = [
        ColumnName::ItemNumber,
        ColumnName::ItemName,
        ColumnName::ClauseNumber,
        ColumnName::Requirement,
        ColumnName::InspectionResult,
        ColumnName::Conclusion,
        ColumnName::Remark,
    ];

    pub fn header_label(self) -> &'static str {
        match self {
            ColumnName::ItemNumber => "序号",
            ColumnName::ItemName => "检验项目",
            ColumnName::ClauseNumber => "标准条款",
            ColumnName::Requirement => "标准要求",
            ColumnName::InspectionResult => "检验结果",
            ColumnName::Conclusion => "单项结论",
            ColumnName::Remark => "备注",
        }
    }

    pub fn nominal_index(self) -> usize {
        self as usize
    }
}

/// Column positions derived from the table header. Columns the header did
/// not name fall back to their nominal position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnIndexHints {
    indices: HashMap<ColumnName, usize>,
}

impl ColumnIndexHints {
    pub fn insert(&mut self, column: ColumnName, index: usize) {
        self.indices.insert(column, index);
    }

    pub fn get(&self, column: ColumnName) -> usize {
        self.indices
            .get(&column)
            .copied()
            .unwrap_or_else(|| column.nominal_index())
    }

    pub fn contains(&self, column: ColumnName) -> bool {
        self.indices.contains_key(&column)
    }
}

/// The seven fields a raw row maps onto before continuation resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowFields {
    pub item_number: String,
    pub item_name: String,
    pub clause_number: String,
    pub requirement_text: String,
    pub inspection_result: String,
    pub conclusion: String,
    pub remark: String,
}

impl RowFields {
    pub fn field_mut(&mut self, column: ColumnName) -> &mut String {
        match column {
            ColumnName::ItemNumber => &mut self.item_number,
            ColumnName::ItemName => &mut self.item_name,
            ColumnName::ClauseNumber => &mut self.clause_number,
            ColumnName::Requirement => &mut self.requirement_text,
            ColumnName::InspectionResult => &mut self.inspection_result,
            ColumnName::Conclusion => &mut self.conclusion,
            ColumnName::Remark => &mut self.remark,
        }
    }

    /// Cells in nominal column order.
    pub fn to_cells(&self) -> Vec<String> {
        vec![
            self.item_number.clone(),
            self.item_name.clone(),
            self.clause_number.clone(),
            self.requirement_text.clone(),
            self.inspection_result.clone(),
            self.conclusion.clone(),
            self.remark.clone(),
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CanonicalRow {
    pub item_number: String,
    pub item_name: String,
    pub clause_number: String,
    pub requirement_text: String,
    pub inspection_result: String,
    pub conclusion: String,
    pub remark: String,
    pub page_num: u32,
    pub row_index: usize,
    pub is_first_row_in_page: bool,
    pub original_item_number: String,
    pub has_continuation_mark: bool,
}

impl CanonicalRow {
    pub fn from_fields(fields: RowFields, page_num: u32) -> Self {
        Self {
            original_item_number: fields.item_number.clone(),
            item_number: fields.item_number,
            item_name: fields.item_name,
            clause_number: fields.clause_number,
            requirement_text: fields.requirement_text,
            inspection_result: fields.inspection_result,
            conclusion: fields.conclusion,
            remark: fields.remark,
            page_num,
            ..Self::default()
        }
    }

    pub fn carries_continuation_mark(&self) -> bool {
        self.has_continuation_mark || self.original_item_number.contains(CONTINUATION_CHAR)
    }

    pub fn group_key(&self) -> (&str, &str) {
        (self.item_number.as_str(), self.clause_number.as_str())
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ConclusionStatus {
    Pass,
    Fail,
    NotApplicable,
}

impl ConclusionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ConclusionStatus::Pass => "符合",
            ConclusionStatus::Fail => "不符合",
            ConclusionStatus::NotApplicable => "/",
        }
    }
}

impl Serialize for ConclusionStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequirementCheck {
    pub requirement_text: String,
    pub inspection_result: String,
    pub remark: String,
    pub page_num: u32,
    pub row_index: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClauseCheck {
    pub clause_number: String,
    pub requirements: Vec<RequirementCheck>,
    pub conclusion: String,
    pub expected_conclusion: ConclusionStatus,
    pub is_conclusion_correct: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub conflicting_conclusions: Vec<String>,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    Pass,
    Warning,
    Fail,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InspectionItemCheck {
    pub item_number: String,
    pub item_name: String,
    pub clauses: Vec<ClauseCheck>,
    pub issues: Vec<String>,
    pub status: ItemStatus,
}

/// Tables that form one logical table across consecutive pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableGroup {
    pub start_page: u32,
    pub pages: Vec<u32>,
    pub row_count: usize,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct InspectionItemCheckResult {
    pub has_table: bool,
    pub total_items: usize,
    pub total_clauses: usize,
    pub correct_conclusions: usize,
    pub incorrect_conclusions: usize,
    pub cross_page_continuations: usize,
    pub item_checks: Vec<InspectionItemCheck>,
    pub table_groups: Vec<TableGroup>,
    pub errors: Vec<ErrorItem>,
    pub warnings: Vec<ErrorItem>,
    pub non_empty_field_errors: Vec<ErrorItem>,
    pub serial_number_errors: Vec<ErrorItem>,
    pub continuation_mark_errors: Vec<ErrorItem>,
}

impl InspectionItemCheckResult {
    /// Every ERROR-level finding of the audit, conclusion errors first.
    pub fn all_errors(&self) -> impl Iterator<Item = &ErrorItem> {
        self.errors
            .iter()
            .chain(self.non_empty_field_errors.iter())
            .chain(self.serial_number_errors.iter())
            .chain(self.continuation_mark_errors.iter())
    }
}
