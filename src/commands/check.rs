use std::path::{Path, PathBuf};

use anyhow::{Result, bail};
use tracing::info;

use crate::cli::CheckArgs;
use crate::config::AuditConfig;
use crate::model::ExtractedDocument;
use crate::report::{Auditor, ReportSource};
use crate::util::{read_json, sha256_file, write_json_pretty, write_json_stdout};

pub fn run(args: CheckArgs) -> Result<()> {
    let config = AuditConfig::load(args.config.as_deref())?;
    let auditor = Auditor::new(config)?;

    let document: ExtractedDocument = read_json(&args.input)?;
    info!(
        input = %args.input.display(),
        pages = document.pages.len(),
        labels = document.labels.len(),
        "loaded extracted document"
    );

    let source = ReportSource {
        path: args.input.display().to_string(),
        filename: document.filename.clone(),
        sha256: sha256_file(&args.input)?,
    };
    let report = auditor.audit(&document, source)?;

    if args.json {
        write_json_stdout(&report)?;
    } else {
        let output_path = args
            .output
            .clone()
            .unwrap_or_else(|| default_output_path(&args.input));
        write_json_pretty(&output_path, &report)?;
        info!(path = %output_path.display(), "wrote audit report");
    }

    if args.fail_on_errors && report.has_errors() {
        bail!(
            "audit of {} found {} error finding(s)",
            args.input.display(),
            report.errors.len()
        );
    }

    Ok(())
}

fn default_output_path(input: &Path) -> PathBuf {
    input.with_extension("audit.json")
}
