use super::*;

/// Running state threaded through the row sequence in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContinuationState {
    pub last_item_number: String,
    pub last_item_name: String,
    pub last_clause_number: String,
    current_page: Option<u32>,
    emitted: usize,
}

impl ContinuationState {
    /// Resolves one row against the state. Returns `None` for rows that
    /// are header repeats or carry no identity at all.
    pub fn step(
        &mut self,
        resolver: &ContinuationResolver,
        mut row: CanonicalRow,
    ) -> Option<CanonicalRow> {
        if row.item_number.trim() == HEADER_ITEM_NUMBER {
            debug!(page = row.page_num, "discarding repeated header row");
            return None;
        }

        let mut continuation_numeral: Option<String> = None;
        if row.item_number.contains(CONTINUATION_CHAR) {
            if row.original_item_number.is_empty() {
                row.original_item_number = row.item_number.clone();
            }
            let numeral = resolver.extract_continuation_number(&row.item_number);
            debug!(
                page = row.page_num,
                marker = %row.item_number,
                numeral = %numeral,
                "stripped continuation marker"
            );
            row.item_number = numeral.clone();
            row.has_continuation_mark = true;
            continuation_numeral = Some(numeral);
        }

        let inherits_item = !self.last_item_number.is_empty()
            && (row.item_number.is_empty()
                || continuation_numeral.as_deref() == Some(self.last_item_number.as_str()));
        if inherits_item {
            row.item_number = self.last_item_number.clone();
            if row.item_name.is_empty() {
                row.item_name = self.last_item_name.clone();
            }
        }

        if row.clause_number.is_empty() {
            row.clause_number = self.last_clause_number.clone();
        }

        if row.item_number.is_empty() && row.item_name.is_empty() {
            debug!(page = row.page_num, "discarding row without item identity");
            return None;
        }

        if !row.item_number.is_empty() {
            if row.item_number != self.last_item_number {
                self.last_item_number = row.item_number.clone();
                self.last_item_name = row.item_name.clone();
            } else if !row.item_name.is_empty() {
                self.last_item_name = row.item_name.clone();
            }
        }
        if !row.clause_number.is_empty() {
            self.last_clause_number = row.clause_number.clone();
        }

        row.is_first_row_in_page = self.current_page != Some(row.page_num);
        self.current_page = Some(row.page_num);
        row.row_index = self.emitted;
        self.emitted += 1;

        Some(row)
    }
}

#[derive(Debug)]
pub struct ContinuationResolver {
    marker_number: Regex,
    any_number: Regex,
}

impl ContinuationResolver {
    pub fn new() -> Result<Self> {
        Ok(Self {
            marker_number: Regex::new(r"续\s*[-\s]*(\d+)")
                .context("failed to compile continuation number regex")?,
            any_number: Regex::new(r"\d+").context("failed to compile number regex")?,
        })
    }

    /// "续30", "续 30" and "续-30" all yield "30"; a bare "续" yields "".
    pub fn extract_continuation_number(&self, value: &str) -> String {
        if let Some(captures) = self.marker_number.captures(value)
            && let Some(number) = captures.get(1)
        {
            return number.as_str().to_string();
        }

        self.any_number
            .find(value)
            .map(|number| number.as_str().to_string())
            .unwrap_or_default()
    }

    /// Resolves a whole sequence with fresh state. Applying it to its own
    /// output changes nothing.
    pub fn resolve(&self, rows: Vec<CanonicalRow>) -> Vec<CanonicalRow> {
        rows.into_iter()
            .fold(
                (ContinuationState::default(), Vec::new()),
                |(mut state, mut resolved), row| {
                    if let Some(row) = state.step(self, row) {
                        resolved.push(row);
                    }
                    (state, resolved)
                },
            )
            .1
    }
}
