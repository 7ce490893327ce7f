//! Inspection-item table ("检验项目") parsing and conclusion verification.
//!
//! Raw extracted rows flow through the row normalizer, the continuation
//! resolver, then into both the item/clause aggregator and the three
//! row-level validators. `InspectionItemChecker` ties the stages together.

use std::collections::{HashMap, HashSet};

use anyhow::{Context, Result, bail};
use regex::Regex;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::AuditConfig;
use crate::model::{
    ErrorItem, ExtractedDocument, FindingCode, FindingDetails, PageInput, TableData,
};
use crate::util::{extract_number, leading_number, strip_whitespace};

/// Nominal width of the inspection-item table.
const NOMINAL_COLUMN_COUNT: usize = 7;
const HEADER_ITEM_NUMBER: &str = "序号";
const CONTINUATION_CHAR: char = '续';

mod aggregate;
mod conclusion;
mod continuation;
mod field_checks;
mod row_normalize;
mod run;
mod serial_checks;
mod table_detect;
mod types;

pub use run::InspectionItemChecker;
pub use types::InspectionItemCheckResult;

use aggregate::*;
use conclusion::*;
use continuation::*;
use field_checks::*;
use row_normalize::*;
use serial_checks::*;
use table_detect::*;
use types::*;
