use std::path::Path;

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::util::read_json;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    pub required_headers: Vec<String>,
    pub continuation_markers: Vec<String>,
    pub home_third_fields: Vec<String>,
    pub flag_conflicting_conclusions: bool,
    pub min_label_confidence: f64,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            required_headers: ["序号", "检验项目", "标准条款", "标准要求", "检验结果", "单项结论", "备注"]
                .into_iter()
                .map(str::to_string)
                .collect(),
            continuation_markers: ["续", "续表", "续上表", "续前表"]
                .into_iter()
                .map(str::to_string)
                .collect(),
            home_third_fields: ["委托方", "样品名称", "型号规格"]
                .into_iter()
                .map(str::to_string)
                .collect(),
            flag_conflicting_conclusions: true,
            min_label_confidence: 0.0,
        }
    }
}

impl AuditConfig {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => {
                let config: Self = read_json(path)?;
                info!(path = %path.display(), "loaded audit configuration");
                config
            }
            None => Self::default(),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.required_headers.is_empty() {
            bail!("required_headers must name at least one column");
        }
        if self
            .required_headers
            .iter()
            .any(|header| header.trim().is_empty())
        {
            bail!("required_headers must not contain blank names");
        }
        if self.continuation_markers.iter().any(|marker| marker.trim().is_empty()) {
            bail!("continuation_markers must not contain blank markers");
        }
        if !(0.0..=1.0).contains(&self.min_label_confidence) {
            bail!(
                "min_label_confidence must be within [0, 1], got {}",
                self.min_label_confidence
            );
        }
        Ok(())
    }
}
