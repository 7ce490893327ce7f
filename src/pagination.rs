//! Page-number continuity ("共XXX页 第Y页") from the report's first page
//! to the end of the document.

use anyhow::{Context, Result};
use regex::Regex;
use serde::Serialize;
use tracing::{debug, info};

use crate::model::{ErrorItem, FindingCode, FindingDetails, PageInput};
use crate::util::strip_whitespace;

/// Header text of the page numbering starts on.
const START_PAGE_MARKER: &str = "检验报告首页";
const PAGE_NUMBER_LOCATION: &str = "页码区域";

/// The "共XXX页 第Y页" stamp found on one page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageNumberInfo {
    pub page_num: u32,
    pub total_pages: u32,
    pub current_page: u32,
    pub raw_text: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct PageNumberCheckResult {
    pub pages: Vec<PageNumberInfo>,
    pub errors: Vec<ErrorItem>,
}

#[derive(Debug)]
pub struct PageNumberChecker {
    pattern: Regex,
}

impl PageNumberChecker {
    pub fn new() -> Result<Self> {
        let pattern = Regex::new(r"共\s*(\d+)\s*页\s*第\s*(\d+)\s*页")
            .context("failed to compile page-number pattern")?;
        Ok(Self { pattern })
    }

    pub fn check(&self, pages: &[PageInput]) -> PageNumberCheckResult {
        let mut ordered = pages.iter().collect::<Vec<&PageInput>>();
        ordered.sort_by_key(|page| page.page_num);

        let Some(start) = ordered.iter().position(|page| {
            page.page_header
                .as_deref()
                .is_some_and(|header| strip_whitespace(header).contains(START_PAGE_MARKER))
        }) else {
            debug!("no page header carries the first-page marker; skipping page numbers");
            return PageNumberCheckResult::default();
        };

        let stamps = ordered[start..]
            .iter()
            .filter_map(|page| self.extract(page))
            .collect::<Vec<PageNumberInfo>>();
        let errors = validate_page_numbers(&stamps);

        info!(
            start_page = ordered[start].page_num,
            stamped_pages = stamps.len(),
            errors = errors.len(),
            "page-number audit complete"
        );

        PageNumberCheckResult {
            pages: stamps,
            errors,
        }
    }

    /// Reads the stamp from the page header, then from the page text.
    fn extract(&self, page: &PageInput) -> Option<PageNumberInfo> {
        let info = [page.page_header.as_deref(), page.text_content.as_deref()]
            .into_iter()
            .flatten()
            .find_map(|text| {
                let captures = self.pattern.captures(text)?;
                Some(PageNumberInfo {
                    page_num: page.page_num,
                    total_pages: captures[1].parse().ok()?,
                    current_page: captures[2].parse().ok()?,
                    raw_text: captures[0].to_string(),
                })
            });

        if info.is_none() {
            debug!(page = page.page_num, "no page-number stamp found");
        }
        info
    }
}

/// Three rules over the stamps in page order:
/// every total equals the first page's total, Y counts up from 1 without
/// gaps or repeats, and the last Y equals its total.
fn validate_page_numbers(stamps: &[PageNumberInfo]) -> Vec<ErrorItem> {
    let mut errors = Vec::new();
    let (Some(first), Some(last)) = (stamps.first(), stamps.last()) else {
        return errors;
    };

    for stamp in stamps.iter().filter(|stamp| stamp.total_pages != first.total_pages) {
        errors.push(
            ErrorItem::error(
                FindingCode::PageNumberTotalMismatch,
                format!(
                    "页码总页数不一致：第{}页标记为'共{}页'，但首页标记为'共{}页'",
                    stamp.page_num, stamp.total_pages, first.total_pages
                ),
            )
            .at_page(stamp.page_num)
            .at_location(PAGE_NUMBER_LOCATION.to_string())
            .with_details(details(stamp, first.total_pages, stamp.total_pages)),
        );
    }

    let mut expected = 1;
    let mut previous: Option<&PageNumberInfo> = None;
    for stamp in stamps {
        if stamp.current_page == expected {
            expected += 1;
        } else {
            let message = match previous {
                Some(previous) if previous.current_page == stamp.current_page => format!(
                    "页码重复：第{}页标记为'第{}页'，与第{}页重复",
                    stamp.page_num, stamp.current_page, previous.page_num
                ),
                _ => format!(
                    "页码跳号：第{}页标记为'第{}页'，期望为'第{}页'",
                    stamp.page_num, stamp.current_page, expected
                ),
            };
            errors.push(
                ErrorItem::error(FindingCode::PageNumberDiscontinuous, message)
                    .at_page(stamp.page_num)
                    .at_location(PAGE_NUMBER_LOCATION.to_string())
                    .with_details(details(stamp, expected, stamp.current_page)),
            );
        }
        previous = Some(stamp);
    }

    if last.current_page != last.total_pages {
        errors.push(
            ErrorItem::error(
                FindingCode::PageNumberLastMismatch,
                format!(
                    "末页页码错误：最后一页（第{}页）标记为'共{}页 第{}页'，但当前页码{}不等于总页数{}",
                    last.page_num,
                    last.total_pages,
                    last.current_page,
                    last.current_page,
                    last.total_pages
                ),
            )
            .at_page(last.page_num)
            .at_location(PAGE_NUMBER_LOCATION.to_string())
            .with_details(details(last, last.total_pages, last.current_page)),
        );
    }

    errors
}

fn details(stamp: &PageNumberInfo, expected: u32, actual: u32) -> FindingDetails {
    FindingDetails {
        expected: Some(expected.to_string()),
        actual: Some(actual.to_string()),
        values: vec![stamp.raw_text.clone()],
        ..FindingDetails::default()
    }
}
