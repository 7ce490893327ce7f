use super::*;

struct ClauseGroup<'a> {
    clause_number: &'a str,
    rows: Vec<&'a CanonicalRow>,
}

struct ItemGroup<'a> {
    item_number: &'a str,
    item_name: &'a str,
    clauses: Vec<ClauseGroup<'a>>,
}

impl<'a> ItemGroup<'a> {
    fn push(&mut self, row: &'a CanonicalRow) {
        if let Some(clause) = self
            .clauses
            .iter_mut()
            .find(|clause| clause.clause_number == row.clause_number)
        {
            clause.rows.push(row);
        } else {
            self.clauses.push(ClauseGroup {
                clause_number: &row.clause_number,
                rows: vec![row],
            });
        }
    }
}

/// Groups resolved rows into items and clauses and checks every clause
/// conclusion. Returns the items sorted by their numeric serial and the
/// WARN findings raised along the way.
pub fn aggregate_items(
    rows: &[CanonicalRow],
    flag_conflicting_conclusions: bool,
) -> (Vec<InspectionItemCheck>, Vec<ErrorItem>) {
    let mut groups = Vec::<ItemGroup>::new();
    let mut positions = HashMap::<&str, usize>::new();

    for row in rows {
        let position = *positions
            .entry(row.item_number.as_str())
            .or_insert_with(|| {
                groups.push(ItemGroup {
                    item_number: &row.item_number,
                    item_name: &row.item_name,
                    clauses: Vec::new(),
                });
                groups.len() - 1
            });
        groups[position].push(row);
    }

    let mut warnings = Vec::new();
    let mut items = groups
        .into_iter()
        .map(|group| build_item(group, flag_conflicting_conclusions, &mut warnings))
        .collect::<Vec<InspectionItemCheck>>();

    // Stable: items sharing a numeric value keep first-seen order.
    items.sort_by_key(|item| extract_number(&item.item_number));

    (items, warnings)
}

fn build_item(
    group: ItemGroup<'_>,
    flag_conflicting_conclusions: bool,
    warnings: &mut Vec<ErrorItem>,
) -> InspectionItemCheck {
    let mut issues = Vec::new();
    let mut clauses = Vec::with_capacity(group.clauses.len());

    for clause_group in group.clauses {
        let clause = build_clause(&clause_group);

        if !clause.is_conclusion_correct {
            issues.push(format!(
                "标准条款 {} 单项结论应为 {}，实际为 {}",
                clause.clause_number,
                clause.expected_conclusion.as_str(),
                display_value(&clause.conclusion)
            ));
        }

        if flag_conflicting_conclusions && clause.conflicting_conclusions.len() > 1 {
            let message = format!(
                "序号 {} 标准条款 {}: 单项结论存在多个不同取值（{}）",
                group.item_number,
                clause.clause_number,
                clause.conflicting_conclusions.join("、")
            );
            issues.push(message.clone());

            let mut warning = ErrorItem::warn(FindingCode::ConclusionConflict, message)
                .at_location(format!("检验项目表格/{}", group.item_name))
                .with_details(FindingDetails {
                    item_number: Some(group.item_number.to_string()),
                    item_name: Some(group.item_name.to_string()),
                    clause_number: Some(clause.clause_number.clone()),
                    actual: Some(clause.conclusion.clone()),
                    values: clause.conflicting_conclusions.clone(),
                    ..FindingDetails::default()
                });
            if let Some(first) = clause_group.rows.first() {
                warning = warning.at_page(first.page_num);
            }
            warnings.push(warning);
        }

        clauses.push(clause);
    }

    let status = if clauses.iter().any(|clause| !clause.is_conclusion_correct) {
        ItemStatus::Fail
    } else if !issues.is_empty() {
        ItemStatus::Warning
    } else {
        ItemStatus::Pass
    };

    InspectionItemCheck {
        item_number: group.item_number.to_string(),
        item_name: group.item_name.to_string(),
        clauses,
        issues,
        status,
    }
}

fn build_clause(group: &ClauseGroup<'_>) -> ClauseCheck {
    let requirements = group
        .rows
        .iter()
        .map(|row| RequirementCheck {
            requirement_text: row.requirement_text.clone(),
            inspection_result: row.inspection_result.clone(),
            remark: row.remark.clone(),
            page_num: row.page_num,
            row_index: row.row_index,
        })
        .collect::<Vec<RequirementCheck>>();

    let results = requirements
        .iter()
        .map(|requirement| requirement.inspection_result.as_str())
        .collect::<Vec<&str>>();
    let expected_conclusion = calculate_expected_conclusion(&results);

    let mut distinct = Vec::<String>::new();
    let mut conclusion = String::new();
    for row in &group.rows {
        let value = row.conclusion.trim();
        if value.is_empty() {
            continue;
        }
        if !distinct.iter().any(|seen| seen == value) {
            distinct.push(value.to_string());
        }
        conclusion = value.to_string();
    }

    let is_conclusion_correct = is_conclusion_valid(&conclusion, expected_conclusion);
    if !is_conclusion_correct {
        debug!(
            clause = group.clause_number,
            expected = expected_conclusion.as_str(),
            actual = %conclusion,
            "clause conclusion mismatch"
        );
    }

    ClauseCheck {
        clause_number: group.clause_number.to_string(),
        requirements,
        conclusion,
        expected_conclusion,
        is_conclusion_correct,
        conflicting_conclusions: if distinct.len() > 1 {
            distinct
        } else {
            Vec::new()
        },
    }
}

fn display_value(value: &str) -> &str {
    if value.is_empty() { "(空)" } else { value }
}
