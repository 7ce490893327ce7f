//! Summary-page ("第三页") cross-checks: extended fields against product
//! label OCR, and first-page metadata against the summary page.

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use regex::Regex;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::AuditConfig;
use crate::model::{ErrorItem, FieldComparison, FindingCode, FindingDetails, LabelInput};
use crate::util::strip_whitespace;

/// Page the summary table sits on in every report layout we audit.
const THIRD_PAGE_NUM: u32 = 3;
const SAMPLE_NAME_FIELD: &str = "样品名称";

mod fields;
#[cfg(test)]
mod tests;
mod third_page;

pub use third_page::{
    ThirdPageCheckResult, ThirdPageChecker, compare_home_third, home_third_findings,
};

use fields::*;
use third_page::*;
