use super::*;

/// Values the conclusion column can hold; used to tell a six-cell row that
/// lost its result column from one that lost its remark column.
const CONCLUSION_CELL_VALUES: [&str; 4] = ["符合", "不符合", "/", ""];

/// Physical shape of an extracted row relative to the header width.
///
/// Table extraction splits and merges cells unpredictably around merged
/// regions, so each width gets its own mapping rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowShape<'a> {
    /// Fewer than two cells; nothing to map.
    Degenerate,
    /// Same width as the header: map through the column hints.
    Full(&'a [String]),
    /// Wider than the header: extra classification cells sit before the
    /// requirement column.
    Widened { cells: &'a [String], extra: usize },
    /// Two to four cells: a merged-cell sub-row of requirement fragments
    /// followed by the inspection result.
    Fragment(&'a [String]),
    /// Five cells: requirement fragments, result, conclusion.
    FiveCell(&'a [String]),
    /// Six cells whose first cell is an item number (or carries "续").
    SixCellNumbered(&'a [String]),
    /// Six cells that start at the item-name column.
    SixCellUnnumbered(&'a [String]),
    /// Narrower than the header but wider than six cells.
    Unmapped(&'a [String]),
}

impl<'a> RowShape<'a> {
    pub fn classify(cells: &'a [String], header_col_count: usize) -> Self {
        let len = cells.len();

        if len < 2 {
            RowShape::Degenerate
        } else if len == header_col_count {
            RowShape::Full(cells)
        } else if len > header_col_count {
            RowShape::Widened {
                cells,
                extra: len - header_col_count,
            }
        } else if len <= 4 {
            RowShape::Fragment(cells)
        } else if len == 5 {
            RowShape::FiveCell(cells)
        } else if len == 6 {
            let first = cell(cells, 0);
            if looks_like_item_number(&first) {
                RowShape::SixCellNumbered(cells)
            } else {
                RowShape::SixCellUnnumbered(cells)
            }
        } else {
            RowShape::Unmapped(cells)
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            RowShape::Degenerate => "degenerate",
            RowShape::Full(_) => "full",
            RowShape::Widened { .. } => "widened",
            RowShape::Fragment(_) => "fragment",
            RowShape::FiveCell(_) => "five_cell",
            RowShape::SixCellNumbered(_) => "six_cell_numbered",
            RowShape::SixCellUnnumbered(_) => "six_cell_unnumbered",
            RowShape::Unmapped(_) => "unmapped",
        }
    }
}

/// Maps one raw row onto the seven canonical fields. Fields the row does
/// not carry stay blank for the continuation resolver to fill.
pub fn normalize_row(
    cells: &[String],
    hints: &ColumnIndexHints,
    header_col_count: usize,
) -> Option<RowFields> {
    let shape = RowShape::classify(cells, header_col_count);
    let mut fields = RowFields::default();

    match shape {
        RowShape::Degenerate => return None,
        RowShape::Full(cells) => {
            for column in ColumnName::ALL {
                *fields.field_mut(column) = cell(cells, hints.get(column));
            }
        }
        RowShape::Widened { cells, extra } => {
            fields.item_number = cell(cells, 0);
            fields.item_name = cell(cells, 1);
            fields.clause_number = cell(cells, 2);

            let requirement_start = hints.get(ColumnName::Requirement);
            fields.requirement_text =
                join_cells(cells, requirement_start..requirement_start + extra + 1);

            fields.inspection_result = cell(cells, hints.get(ColumnName::InspectionResult) + extra);
            fields.conclusion = cell(cells, hints.get(ColumnName::Conclusion) + extra);
            fields.remark = cell(cells, hints.get(ColumnName::Remark) + extra);
        }
        RowShape::Fragment(cells) => {
            let last = cells.len() - 1;
            fields.requirement_text = join_cells(cells, 0..last);
            fields.inspection_result = cell(cells, last);
        }
        RowShape::FiveCell(cells) => {
            fields.requirement_text = join_cells(cells, 0..3);
            fields.inspection_result = cell(cells, 3);
            fields.conclusion = cell(cells, 4);
        }
        RowShape::SixCellNumbered(cells) => {
            fields.item_number = cell(cells, 0);
            fields.item_name = cell(cells, 1);
            fields.clause_number = cell(cells, 2);
            fields.requirement_text = cell(cells, 3);

            let fifth = cell(cells, 4);
            if CONCLUSION_CELL_VALUES.contains(&fifth.as_str()) {
                // Result column missing.
                fields.conclusion = fifth;
                fields.remark = cell(cells, 5);
            } else {
                // Remark column missing.
                fields.inspection_result = fifth;
                fields.conclusion = cell(cells, 5);
            }
        }
        RowShape::SixCellUnnumbered(cells) => {
            fields.item_name = cell(cells, 0);
            fields.clause_number = cell(cells, 1);
            fields.requirement_text = cell(cells, 2);
            fields.inspection_result = cell(cells, 3);
            fields.conclusion = cell(cells, 4);
            fields.remark = cell(cells, 5);
        }
        RowShape::Unmapped(cells) => {
            debug!(
                cells = cells.len(),
                header_col_count, "row width has no column mapping; fields left blank"
            );
        }
    }

    Some(fields)
}

pub fn row_is_blank(cells: &[String]) -> bool {
    cells.iter().all(|value| value.trim().is_empty())
}

fn looks_like_item_number(value: &str) -> bool {
    (!value.is_empty() && value.chars().all(|ch| ch.is_ascii_digit()))
        || value.contains(CONTINUATION_CHAR)
}

fn cell(cells: &[String], index: usize) -> String {
    cells
        .get(index)
        .map(|value| value.trim().to_string())
        .unwrap_or_default()
}

fn join_cells(cells: &[String], range: std::ops::Range<usize>) -> String {
    range
        .filter_map(|index| cells.get(index))
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
        .collect::<Vec<&str>>()
        .join(" ")
}
