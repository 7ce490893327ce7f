use super::*;

/// Audits the inspection-item tables of one document. Each checker owns
/// its compiled patterns; continuation state lives only inside a call.
#[derive(Debug)]
pub struct InspectionItemChecker {
    config: AuditConfig,
    detector: TableDetector,
    resolver: ContinuationResolver,
}

impl InspectionItemChecker {
    pub fn new(config: AuditConfig) -> Result<Self> {
        config.validate()?;
        let detector = TableDetector::new(&config)?;
        let resolver = ContinuationResolver::new()?;

        Ok(Self {
            config,
            detector,
            resolver,
        })
    }

    pub fn check_document(&self, document: &ExtractedDocument) -> Result<InspectionItemCheckResult> {
        validate_document(document)?;

        let tables = self.detect_tables(document);
        if tables.is_empty() {
            warn!(
                pages = document.pages.len(),
                "no inspection-item table found; skipping conclusion checks"
            );
            return Ok(InspectionItemCheckResult::default());
        }

        let table_groups = self
            .detector
            .group_continuation_tables(&tables, &document.pages);

        let mut result = self.check_rows(self.normalize_tables(&tables));
        result.cross_page_continuations = tables.len().saturating_sub(1);
        result.table_groups = table_groups;

        info!(
            tables = tables.len(),
            items = result.total_items,
            clauses = result.total_clauses,
            incorrect = result.incorrect_conclusions,
            empty_fields = result.non_empty_field_errors.len(),
            serial_errors = result.serial_number_errors.len(),
            continuation_errors = result.continuation_mark_errors.len(),
            "inspection-item audit complete"
        );

        Ok(result)
    }

    /// Inspection-item tables of the document in page order.
    pub fn detect_tables<'a>(&self, document: &'a ExtractedDocument) -> Vec<&'a TableData> {
        let mut tables = document
            .pages
            .iter()
            .flat_map(|page| page.tables.iter())
            .filter(|table| self.detector.is_inspection_table(table))
            .collect::<Vec<&TableData>>();
        tables.sort_by_key(|table| (table.page_num, table.table_index));

        debug!(tables = tables.len(), "detected inspection-item tables");
        tables
    }

    /// Normalized and continuation-resolved rows of every table, in
    /// document order.
    pub fn extract_rows(&self, tables: &[&TableData]) -> Vec<CanonicalRow> {
        self.resolver.resolve(self.normalize_tables(tables))
    }

    fn normalize_tables(&self, tables: &[&TableData]) -> Vec<CanonicalRow> {
        let mut rows = Vec::new();

        for table in tables {
            let hints = column_index_hints(&table.headers);
            let header_col_count = if table.headers.is_empty() {
                NOMINAL_COLUMN_COUNT
            } else {
                table.headers.len()
            };

            for cells in &table.rows {
                if cells.len() < 2 || row_is_blank(cells) {
                    continue;
                }

                let Some(fields) = normalize_row(cells, &hints, header_col_count) else {
                    continue;
                };
                debug!(
                    page = table.page_num,
                    shape = RowShape::classify(cells, header_col_count).name(),
                    fields = ?fields.to_cells(),
                    "normalized row"
                );
                rows.push(CanonicalRow::from_fields(fields, table.page_num));
            }
        }

        rows
    }

    /// Resolves continuation on normalized rows and runs every check.
    pub fn check_rows(&self, rows: Vec<CanonicalRow>) -> InspectionItemCheckResult {
        let rows = self.resolver.resolve(rows);
        self.assemble(&rows)
    }

    fn assemble(&self, rows: &[CanonicalRow]) -> InspectionItemCheckResult {
        let (item_checks, warnings) =
            aggregate_items(rows, self.config.flag_conflicting_conclusions);
        let errors = collect_conclusion_errors(&item_checks);
        let SerialFindings {
            serial,
            continuation_marks,
        } = check_serial_number_continuity(rows);

        let total_clauses = item_checks.iter().map(|item| item.clauses.len()).sum();
        let correct_conclusions = item_checks
            .iter()
            .flat_map(|item| item.clauses.iter())
            .filter(|clause| clause.is_conclusion_correct)
            .count();

        InspectionItemCheckResult {
            has_table: true,
            total_items: item_checks.len(),
            total_clauses,
            correct_conclusions,
            incorrect_conclusions: total_clauses - correct_conclusions,
            cross_page_continuations: 0,
            item_checks,
            table_groups: Vec::new(),
            errors,
            warnings,
            non_empty_field_errors: check_non_empty_fields(rows),
            serial_number_errors: serial,
            continuation_mark_errors: continuation_marks,
        }
    }
}

fn validate_document(document: &ExtractedDocument) -> Result<()> {
    let mut seen = HashSet::new();

    for page in &document.pages {
        if page.page_num == 0 {
            bail!("page numbers are 1-based; found page 0");
        }
        if !seen.insert(page.page_num) {
            bail!("page {} appears more than once", page.page_num);
        }
        for table in &page.tables {
            if table.page_num != page.page_num {
                bail!(
                    "table {} on page {} claims page {}",
                    table.table_index,
                    page.page_num,
                    table.page_num
                );
            }
        }
    }

    Ok(())
}
