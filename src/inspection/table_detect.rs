use super::*;

/// Header-repeat detection looks at the first three canonical columns only.
const HEADER_REPEAT_COLUMNS: [ColumnName; 3] = [
    ColumnName::ItemNumber,
    ColumnName::ItemName,
    ColumnName::ClauseNumber,
];

#[derive(Debug)]
pub struct TableDetector {
    required_headers: Vec<String>,
    continuation_marker: Regex,
}

impl TableDetector {
    pub fn new(config: &AuditConfig) -> Result<Self> {
        let mut markers = config
            .continuation_markers
            .iter()
            .map(|marker| strip_whitespace(marker))
            .filter(|marker| !marker.is_empty())
            .collect::<Vec<String>>();
        // Longest first so "续上表" wins over "续" in the alternation.
        markers.sort_by(|a, b| b.chars().count().cmp(&a.chars().count()));
        if markers.is_empty() {
            bail!("at least one continuation marker is required");
        }

        let pattern = format!(
            "(?:{})\\d*",
            markers
                .iter()
                .map(|marker| regex::escape(marker))
                .collect::<Vec<String>>()
                .join("|")
        );

        Ok(Self {
            required_headers: config
                .required_headers
                .iter()
                .map(|header| strip_whitespace(header))
                .collect(),
            continuation_marker: Regex::new(&pattern)
                .context("failed to compile continuation marker regex")?,
        })
    }

    pub fn is_inspection_table(&self, table: &TableData) -> bool {
        if table.headers.is_empty() {
            return false;
        }

        let headers = strip_whitespace(&table.headers.join(" "));
        self.required_headers
            .iter()
            .all(|required| headers.contains(required.as_str()))
    }

    pub fn is_continuation_page(&self, page_text: Option<&str>) -> bool {
        let Some(text) = page_text else {
            return false;
        };

        let cleaned = strip_whitespace(text);
        !cleaned.is_empty() && self.continuation_marker.is_match(&cleaned)
    }

    pub fn page_is_continuation(&self, page: &PageInput) -> bool {
        self.is_continuation_page(page.page_header.as_deref())
            || self.is_continuation_page(page.text_content.as_deref())
    }

    /// Groups inspection tables that continue across consecutive pages.
    pub fn group_continuation_tables(
        &self,
        tables: &[&TableData],
        pages: &[PageInput],
    ) -> Vec<TableGroup> {
        let mut sorted = tables.to_vec();
        sorted.sort_by_key(|table| (table.page_num, table.table_index));

        let continuation_pages = pages
            .iter()
            .filter(|page| self.page_is_continuation(page))
            .map(|page| page.page_num)
            .collect::<HashSet<u32>>();

        let mut groups = Vec::<TableGroup>::new();
        let mut previous_page: Option<u32> = None;

        for table in sorted {
            let joins_previous = previous_page
                .map(|page| table.page_num == page + 1)
                .unwrap_or(false)
                && continuation_pages.contains(&table.page_num);

            match groups.last_mut() {
                Some(group) if joins_previous => {
                    group.pages.push(table.page_num);
                    group.row_count += continuation_row_count(&table.rows);
                }
                _ => groups.push(TableGroup {
                    start_page: table.page_num,
                    pages: vec![table.page_num],
                    row_count: table.rows.len(),
                }),
            }

            previous_page = Some(table.page_num);
        }

        groups
    }
}

/// Rows a continuation table contributes, not counting a repeated header.
fn continuation_row_count(rows: &[Vec<String>]) -> usize {
    let Some(first) = rows.first() else {
        return 0;
    };

    let joined = first.join(" ");
    let repeats_header = HEADER_REPEAT_COLUMNS
        .iter()
        .any(|column| joined.contains(column.header_label()));

    if repeats_header && rows.len() > 1 {
        rows.len() - 1
    } else {
        rows.len()
    }
}

pub fn column_index_hints(headers: &[String]) -> ColumnIndexHints {
    let mut hints = ColumnIndexHints::default();

    for (index, header) in headers.iter().enumerate() {
        let cleaned = strip_whitespace(header);
        if let Some(column) = ColumnName::ALL
            .iter()
            .find(|column| cleaned.contains(column.header_label()))
        {
            hints.insert(*column, index);
        }
    }

    let missing = ColumnName::ALL
        .iter()
        .filter(|column| !hints.contains(**column))
        .map(|column| column.header_label())
        .collect::<Vec<&str>>();
    if !missing.is_empty() {
        debug!(missing = ?missing, "header lacks columns; using nominal positions");
    }

    hints
}
