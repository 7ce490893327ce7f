use super::*;

/// Single dashes are not legal placeholders; a cell holding only one is
/// treated like a blank cell.
const ILLEGAL_DASHES: [&str; 2] = ["-", "—"];

/// "/" and "——" are legal placeholders and count as filled.
pub fn is_filled(value: &str) -> bool {
    let trimmed = value.trim();
    !trimmed.is_empty() && !ILLEGAL_DASHES.contains(&trimmed)
}

/// A parent row of a multi-level requirement: it opens its
/// (item, clause) run with no result of its own, and a later row of the
/// same run carries one. The lookahead stops at the first change of
/// (item, clause), even if the same key reappears later in the item.
pub fn is_title_row(rows: &[CanonicalRow], index: usize) -> bool {
    let Some(row) = rows.get(index) else {
        return false;
    };

    let opens_run = index == 0 || rows[index - 1].group_key() != row.group_key();
    if !opens_run || is_filled(&row.inspection_result) {
        return false;
    }

    rows[index + 1..]
        .iter()
        .take_while(|next| next.group_key() == row.group_key())
        .any(|next| is_filled(&next.inspection_result))
}

/// Checks result, conclusion and remark on every row independently.
pub fn check_non_empty_fields(rows: &[CanonicalRow]) -> Vec<ErrorItem> {
    let mut errors = Vec::new();

    for (index, row) in rows.iter().enumerate() {
        if is_title_row(rows, index) {
            debug!(
                item = %row.item_number,
                clause = %row.clause_number,
                "skipping title row"
            );
            continue;
        }

        let checks = [
            (
                FindingCode::EmptyInspectionResult,
                "检验结果",
                &row.inspection_result,
            ),
            (FindingCode::EmptyConclusion, "单项结论", &row.conclusion),
            (FindingCode::EmptyRemark, "备注", &row.remark),
        ];

        for (code, field_name, value) in checks {
            if is_filled(value) {
                continue;
            }

            errors.push(
                ErrorItem::error(
                    code,
                    format!(
                        "序号 {} 标准条款 {}: {}为空",
                        row.item_number, row.clause_number, field_name
                    ),
                )
                .at_page(row.page_num)
                .at_location(format!("检验项目表格/{}", row.item_name))
                .with_details(FindingDetails {
                    row_index: Some(row.row_index),
                    item_number: Some(row.item_number.clone()),
                    item_name: Some(row.item_name.clone()),
                    clause_number: Some(row.clause_number.clone()),
                    field_name: Some(field_name.to_string()),
                    actual: Some(value.clone()),
                    ..FindingDetails::default()
                }),
            );
        }
    }

    errors
}
