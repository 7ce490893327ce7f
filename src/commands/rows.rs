use anyhow::Result;
use tracing::info;

use crate::cli::RowsArgs;
use crate::config::AuditConfig;
use crate::model::ExtractedDocument;
use crate::report::Auditor;
use crate::util::{read_json, write_json_stdout};

pub fn run(args: RowsArgs) -> Result<()> {
    let config = AuditConfig::load(args.config.as_deref())?;
    let auditor = Auditor::new(config)?;
    let document: ExtractedDocument = read_json(&args.input)?;

    let checker = auditor.inspection();
    let tables = checker.detect_tables(&document);
    let rows = checker.extract_rows(&tables);

    info!(
        input = %args.input.display(),
        tables = tables.len(),
        rows = rows.len(),
        "resolved inspection-item rows"
    );

    write_json_stdout(&rows)
}
