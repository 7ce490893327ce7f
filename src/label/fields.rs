use super::*;

/// Extended summary-page fields that are verified against product labels.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize)]
pub enum LabelField {
    ModelSpec,
    ProductionDate,
    SerialOrBatch,
}

impl LabelField {
    pub const ALL: [LabelField; 3] = [
        LabelField::ModelSpec,
        LabelField::ProductionDate,
        LabelField::SerialOrBatch,
    ];

    pub fn display_name(self) -> &'static str {
        match self {
            LabelField::ModelSpec => "型号规格",
            LabelField::ProductionDate => "生产日期",
            LabelField::SerialOrBatch => "产品编号/批号",
        }
    }

    /// Names the summary table uses for the field.
    fn table_synonyms(self) -> &'static [&'static str] {
        match self {
            LabelField::ModelSpec => &["型号规格", "规格型号", "型号", "规格"],
            LabelField::ProductionDate => &["生产日期", "MFG", "MFD"],
            LabelField::SerialOrBatch => &["产品编号", "批号", "序列号", "LOT", "SN"],
        }
    }

    /// Lowercased keys label OCR may report the field under.
    fn label_synonyms(self) -> &'static [&'static str] {
        match self {
            LabelField::ModelSpec => &["型号", "规格", "规格型号", "model", "spec"],
            LabelField::ProductionDate => &["mfg", "mfd", "生产日期", "production_date"],
            LabelField::SerialOrBatch => &[
                "批号",
                "lot",
                "序列号",
                "sn",
                "serial_number",
                "batch_number",
            ],
        }
    }

    /// Classifies a summary-table field name; the first field whose
    /// synonym the name contains wins.
    pub fn from_table_field_name(name: &str) -> Option<LabelField> {
        let cleaned = strip_whitespace(name);
        if cleaned.is_empty() {
            return None;
        }

        LabelField::ALL.into_iter().find(|field| {
            field
                .table_synonyms()
                .iter()
                .any(|synonym| cleaned.contains(synonym))
        })
    }
}

/// Looks up `field` in OCR structured data. Exact key matches beat
/// containment matches; keys compare case-insensitively.
pub fn resolve_label_value(
    field: LabelField,
    structured_data: &BTreeMap<String, String>,
) -> Option<String> {
    let keyed = structured_data
        .iter()
        .map(|(key, value)| (key.trim().to_lowercase(), value.trim()))
        .filter(|(key, value)| !key.is_empty() && !value.is_empty())
        .collect::<Vec<(String, &str)>>();

    let synonyms = field.label_synonyms();

    let exact = keyed
        .iter()
        .find(|(key, _)| synonyms.contains(&key.as_str()));
    let found = exact.or_else(|| {
        keyed.iter().find(|(key, _)| {
            synonyms
                .iter()
                .any(|synonym| key.contains(synonym) || synonym.contains(key.as_str()))
        })
    });

    found.map(|(_, value)| value.to_string())
}
