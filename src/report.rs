use anyhow::Result;
use serde::Serialize;
use tracing::info;

use crate::config::AuditConfig;
use crate::inspection::{InspectionItemCheckResult, InspectionItemChecker};
use crate::label::{ThirdPageCheckResult, ThirdPageChecker, compare_home_third, home_third_findings};
use crate::model::{ErrorItem, ExtractedDocument, FieldComparison, FindingCode, FindingDetails};
use crate::pagination::{PageNumberCheckResult, PageNumberChecker};
use crate::util::now_utc_string;

const REPORT_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize)]
pub struct ReportSource {
    pub path: String,
    pub filename: Option<String>,
    pub sha256: String,
}

#[derive(Debug, Serialize)]
pub struct AuditReport {
    pub report_version: u32,
    pub generated_at: String,
    pub status: String,
    pub source: ReportSource,
    pub inspection: InspectionItemCheckResult,
    pub home_third_comparisons: Vec<FieldComparison>,
    pub third_page: ThirdPageCheckResult,
    pub page_numbers: PageNumberCheckResult,
    pub errors: Vec<ErrorItem>,
    pub warnings: Vec<ErrorItem>,
    pub info: Vec<ErrorItem>,
}

impl AuditReport {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Runs every check over one extracted document. Construct one per audit
/// configuration; it holds no per-document state.
#[derive(Debug)]
pub struct Auditor {
    config: AuditConfig,
    inspection: InspectionItemChecker,
    third_page: ThirdPageChecker,
    page_numbers: PageNumberChecker,
}

impl Auditor {
    pub fn new(config: AuditConfig) -> Result<Self> {
        let inspection = InspectionItemChecker::new(config.clone())?;
        let third_page = ThirdPageChecker::new(&config)?;
        let page_numbers = PageNumberChecker::new()?;

        Ok(Self {
            config,
            inspection,
            third_page,
            page_numbers,
        })
    }

    pub fn inspection(&self) -> &InspectionItemChecker {
        &self.inspection
    }

    pub fn audit(&self, document: &ExtractedDocument, source: ReportSource) -> Result<AuditReport> {
        let inspection = self.inspection.check_document(document)?;
        let home_third_comparisons = compare_home_third(
            &document.home_fields,
            &document.third_page_fields,
            &self.config.home_third_fields,
        );
        let third_page = self
            .third_page
            .check(&document.third_page_fields, &document.labels);
        let page_numbers = self.page_numbers.check(&document.pages);

        let mut errors = home_third_findings(&home_third_comparisons);
        errors.extend(third_page.errors.iter().cloned());
        errors.extend(page_numbers.errors.iter().cloned());
        errors.extend(inspection.all_errors().cloned());

        let warnings = inspection.warnings.clone();

        let mut info = third_page
            .comparisons
            .iter()
            .filter(|comparison| comparison.is_match)
            .map(|comparison| {
                ErrorItem::info(
                    FindingCode::ThirdPageFieldMatched,
                    format!("第三页扩展字段“{}”核对通过", comparison.field_name),
                )
                .at_location(format!("第三页表格/{}", comparison.field_name))
                .with_details(FindingDetails {
                    field_name: Some(comparison.field_name.clone()),
                    expected: Some(comparison.table_value.clone()),
                    actual: Some(comparison.ocr_value.clone()),
                    ..FindingDetails::default()
                })
            })
            .collect::<Vec<ErrorItem>>();
        if inspection.has_table {
            info.push(inspection_summary(&inspection));
        }

        let status = if !errors.is_empty() {
            "failed"
        } else if !warnings.is_empty() {
            "warning"
        } else {
            "passed"
        };

        info!(
            source = %source.path,
            errors = errors.len(),
            warnings = warnings.len(),
            info = info.len(),
            status,
            "audit finished"
        );

        Ok(AuditReport {
            report_version: REPORT_VERSION,
            generated_at: now_utc_string(),
            status: status.to_string(),
            source,
            inspection,
            home_third_comparisons,
            third_page,
            page_numbers,
            errors,
            warnings,
            info,
        })
    }
}

fn inspection_summary(result: &InspectionItemCheckResult) -> ErrorItem {
    ErrorItem::info(
        FindingCode::InspectionSummary,
        format!(
            "检验项目表格：{} 个检验项目，{} 个标准条款，结论正确 {} 个，错误 {} 个，跨页续表 {} 处",
            result.total_items,
            result.total_clauses,
            result.correct_conclusions,
            result.incorrect_conclusions,
            result.cross_page_continuations
        ),
    )
    .at_location("检验项目表格".to_string())
}
