use super::*;

const FAIL_MARKER: &str = "不符合";
/// Placeholders meaning "not tested"; a blank result counts too. The plain
/// hyphen is not one of them.
const NOT_APPLICABLE_RESULTS: [&str; 3] = ["/", "——", "—"];

fn is_not_applicable_result(value: &str) -> bool {
    let trimmed = value.trim();
    trimmed.is_empty() || NOT_APPLICABLE_RESULTS.contains(&trimmed)
}

/// Derives the conclusion a clause should carry from its inspection
/// results. Depends only on the multiset of results.
///
/// 1. any result containing "不符合" → 不符合
/// 2. every result not applicable or blank → /
/// 3. otherwise → 符合
pub fn calculate_expected_conclusion<S: AsRef<str>>(results: &[S]) -> ConclusionStatus {
    if results
        .iter()
        .any(|result| result.as_ref().contains(FAIL_MARKER))
    {
        return ConclusionStatus::Fail;
    }

    if results
        .iter()
        .all(|result| is_not_applicable_result(result.as_ref()))
    {
        return ConclusionStatus::NotApplicable;
    }

    ConclusionStatus::Pass
}

/// A recorded conclusion is valid when it equals the expected one; a
/// not-applicable clause recorded as "符合" is also accepted.
pub fn is_conclusion_valid(actual: &str, expected: ConclusionStatus) -> bool {
    let actual = actual.trim();
    actual == expected.as_str()
        || (expected == ConclusionStatus::NotApplicable
            && actual == ConclusionStatus::Pass.as_str())
}

pub fn conclusion_error_code(expected: ConclusionStatus, actual: &str) -> FindingCode {
    match expected {
        ConclusionStatus::NotApplicable => FindingCode::ConclusionShouldBeNa,
        ConclusionStatus::Pass if actual.trim() == ConclusionStatus::Fail.as_str() => {
            FindingCode::ConclusionShouldNotBeFail
        }
        ConclusionStatus::Pass => FindingCode::ConclusionShouldBePass,
        ConclusionStatus::Fail => FindingCode::ConclusionShouldBeFail,
    }
}

/// One ERROR finding per clause whose recorded conclusion is wrong.
pub fn collect_conclusion_errors(items: &[InspectionItemCheck]) -> Vec<ErrorItem> {
    let mut errors = Vec::new();

    for item in items {
        for clause in item.clauses.iter().filter(|clause| !clause.is_conclusion_correct) {
            let code = conclusion_error_code(clause.expected_conclusion, &clause.conclusion);
            let page_num = clause.requirements.first().map(|requirement| requirement.page_num);

            let mut error = ErrorItem::error(
                code,
                format!(
                    "序号 {} 标准条款 {}: 单项结论错误（期望: {}, 实际: {}）",
                    item.item_number,
                    clause.clause_number,
                    clause.expected_conclusion.as_str(),
                    clause.conclusion
                ),
            )
            .at_location(format!("检验项目表格/{}", item.item_name))
            .with_details(FindingDetails {
                row_index: clause.requirements.first().map(|requirement| requirement.row_index),
                item_number: Some(item.item_number.clone()),
                item_name: Some(item.item_name.clone()),
                clause_number: Some(clause.clause_number.clone()),
                expected: Some(clause.expected_conclusion.as_str().to_string()),
                actual: Some(clause.conclusion.clone()),
                ..FindingDetails::default()
            });
            if let Some(page_num) = page_num {
                error = error.at_page(page_num);
            }

            errors.push(error);
        }
    }

    errors
}
