use super::*;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SerialFindings {
    pub serial: Vec<ErrorItem>,
    pub continuation_marks: Vec<ErrorItem>,
}

#[derive(Default)]
struct SerialScan<'a> {
    seen: HashSet<&'a str>,
    last_new_number: Option<u64>,
    previous: Option<&'a CanonicalRow>,
}

impl<'a> SerialScan<'a> {
    fn visit(&mut self, row: &'a CanonicalRow, findings: &mut SerialFindings) {
        let item_number = row.item_number.trim();

        if item_number.is_empty() {
            findings.serial.push(
                ErrorItem::error(
                    FindingCode::SerialEmpty,
                    format!("第 {} 行序号为空", row.row_index + 1),
                )
                .at_page(row.page_num)
                .at_location(location(row))
                .with_details(details(row)),
            );
            self.previous = Some(row);
            return;
        }

        if self.seen.insert(item_number) {
            let actual = leading_number(item_number);
            if let Some(last) = self.last_new_number {
                let expected = last + 1;
                if actual != Some(expected) {
                    findings.serial.push(
                        ErrorItem::error(
                            FindingCode::SerialNotContinuous,
                            format!("序号不连续：期望 {expected}，实际 {item_number}"),
                        )
                        .at_page(row.page_num)
                        .at_location(location(row))
                        .with_details(FindingDetails {
                            expected: Some(expected.to_string()),
                            actual: Some(item_number.to_string()),
                            ..details(row)
                        }),
                    );
                }
            }
            // A non-numeric serial keeps the previous anchor.
            if actual.is_some() {
                self.last_new_number = actual;
            }
        }

        if let Some(previous) = self.previous
            && previous.page_num != row.page_num
            && previous.item_number.trim() == item_number
            && row.is_first_row_in_page
            && !row.carries_continuation_mark()
        {
            let expected_mark = format!("{CONTINUATION_CHAR}{item_number}");
            findings.continuation_marks.push(
                ErrorItem::error(
                    FindingCode::ContinuationMarkMissing,
                    format!(
                        "序号 {item_number} 跨页续接，第 {} 页首行应标注“{expected_mark}”",
                        row.page_num
                    ),
                )
                .at_page(row.page_num)
                .at_location(location(row))
                .with_details(FindingDetails {
                    expected: Some(expected_mark),
                    actual: Some(row.original_item_number.clone()),
                    is_first_row: Some(true),
                    ..details(row)
                }),
            );
        }

        if row.carries_continuation_mark() && !row.is_first_row_in_page {
            findings.continuation_marks.push(
                ErrorItem::error(
                    FindingCode::ContinuationMarkWrongPosition,
                    format!(
                        "“{}”不在第 {} 页首行，续表标记只能出现在页首",
                        row.original_item_number, row.page_num
                    ),
                )
                .at_page(row.page_num)
                .at_location(location(row))
                .with_details(FindingDetails {
                    is_first_row: Some(false),
                    ..details(row)
                }),
            );
        }

        self.previous = Some(row);
    }
}

fn location(row: &CanonicalRow) -> String {
    format!("检验项目表格/第{}页", row.page_num)
}

fn details(row: &CanonicalRow) -> FindingDetails {
    FindingDetails {
        row_index: Some(row.row_index),
        item_number: Some(row.item_number.clone()),
        item_name: Some(row.item_name.clone()),
        original_item_number: Some(row.original_item_number.clone())
            .filter(|original| !original.is_empty()),
        ..FindingDetails::default()
    }
}

/// Serial continuity and continuation-mark placement in one linear scan
/// with lookback to the previous row.
pub fn check_serial_number_continuity(rows: &[CanonicalRow]) -> SerialFindings {
    let mut findings = SerialFindings::default();
    let mut scan = SerialScan::default();

    for row in rows {
        scan.visit(row, &mut findings);
    }

    findings
}
