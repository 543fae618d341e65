//! Canonical column schema.
//!
//! Every column is classified exactly once, when the [`ColumnSpec`] is built
//! from the reconstructed header. Later stages look columns up by kind and
//! index, never by matching on their names.

use std::fmt::{Display, Formatter};
use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

static DATE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d{1,2})-([a-z]{3})-(\d{4})").expect("hardcoded date regex is valid")
});

pub const HOLDING_PREFIX: &str = "Kepemilikan Per";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Measure {
    Quantity,
    CombinedHolding,
    Percentage,
}

impl Measure {
    pub const ALL: [Self; 3] = [Self::Quantity, Self::CombinedHolding, Self::Percentage];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Quantity => "Jumlah Saham",
            Self::CombinedHolding => "Saham Gabungan Per Investor",
            Self::Percentage => "Persentase Kepemilikan Per Investor (%)",
        }
    }
}

/// Disclosure date embedded in a header label, e.g. `15-DEC-2025`.
///
/// The matched text is uppercased for column names, so `15-Dec-2025` and
/// `15-DEC-2025` name the same column; the parsed date is only used for
/// ordering.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DisclosureDate {
    label: String,
    date: Option<NaiveDate>,
}

impl DisclosureDate {
    /// First `D[D]-MMM-YYYY` occurrence in `text`, case-insensitive.
    #[must_use]
    pub fn find(text: &str) -> Option<Self> {
        let captures = DATE_PATTERN.captures(text)?;
        let label = captures.get(0)?.as_str().to_uppercase();
        let date = match (
            captures[1].parse::<u32>(),
            month_number(&captures[2]),
            captures[3].parse::<i32>(),
        ) {
            (Ok(day), Some(month), Ok(year)) => NaiveDate::from_ymd_opt(year, month, day),
            _ => None,
        };

        Some(Self { label, date })
    }

    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    #[must_use]
    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }
}

impl Display for DisclosureDate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.label)
    }
}

fn month_number(abbrev: &str) -> Option<u32> {
    let month = match abbrev.to_ascii_uppercase().as_str() {
        "JAN" => 1,
        "FEB" => 2,
        "MAR" => 3,
        "APR" => 4,
        "MAY" | "MEI" => 5,
        "JUN" => 6,
        "JUL" => 7,
        "AUG" | "AGU" | "AGS" => 8,
        "SEP" => 9,
        "OCT" | "OKT" => 10,
        "NOV" => 11,
        "DEC" | "DES" => 12,
        _ => return None,
    };
    Some(month)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupingField {
    IssuerCode,
    IssuerName,
    HolderName,
    Nationality,
}

impl GroupingField {
    #[must_use]
    pub const fn role(self) -> &'static str {
        match self {
            Self::IssuerCode => "issuer code",
            Self::IssuerName => "issuer name",
            Self::HolderName => "holder name",
            Self::Nationality => "nationality",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnKind {
    Sequence,
    Grouping(GroupingField),
    /// Address and domicile text, dropped by the normalizer.
    Descriptive,
    Holding {
        date: DisclosureDate,
        measure: Measure,
    },
    Unlabeled,
    Other,
}

/// Which columns the coercer treats as numeric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NumericColumns {
    /// From the first date-parameterized column through the end of the schema.
    #[default]
    HoldingBlock,
    /// The last `n` columns of the schema.
    Trailing(usize),
}

/// Header labels that decide how a plain (non-date) column is classified.
/// Matching is exact after trimming, ignoring ASCII case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnRules {
    pub sequence: Vec<String>,
    pub issuer_code: Vec<String>,
    pub issuer_name: Vec<String>,
    pub holder_name: Vec<String>,
    pub nationality: Vec<String>,
    pub descriptive: Vec<String>,
    pub unlabeled_marker: String,
}

impl Default for ColumnRules {
    fn default() -> Self {
        fn labels(values: &[&str]) -> Vec<String> {
            values.iter().map(|value| (*value).to_string()).collect()
        }

        Self {
            sequence: labels(&["No"]),
            issuer_code: labels(&["Kode Efek", "Kode Emiten"]),
            issuer_name: labels(&["Nama Emiten"]),
            holder_name: labels(&["Nama Pemegang Saham"]),
            nationality: labels(&["Kebangsaan"]),
            descriptive: labels(&["Alamat", "Alamat (Lanjutan)", "Domisili"]),
            unlabeled_marker: "Unnamed".to_string(),
        }
    }
}

impl ColumnRules {
    #[must_use]
    pub fn classify(&self, label: &str) -> ColumnKind {
        let label = label.trim();
        let matches = |candidates: &[String]| {
            candidates
                .iter()
                .any(|candidate| candidate.trim().eq_ignore_ascii_case(label))
        };

        if label.is_empty()
            || (!self.unlabeled_marker.is_empty()
                && label
                    .to_lowercase()
                    .contains(&self.unlabeled_marker.to_lowercase()))
        {
            ColumnKind::Unlabeled
        } else if matches(&self.sequence) {
            ColumnKind::Sequence
        } else if matches(&self.issuer_code) {
            ColumnKind::Grouping(GroupingField::IssuerCode)
        } else if matches(&self.issuer_name) {
            ColumnKind::Grouping(GroupingField::IssuerName)
        } else if matches(&self.holder_name) {
            ColumnKind::Grouping(GroupingField::HolderName)
        } else if matches(&self.nationality) {
            ColumnKind::Grouping(GroupingField::Nationality)
        } else if matches(&self.descriptive) {
            ColumnKind::Descriptive
        } else {
            ColumnKind::Other
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    name: String,
    kind: ColumnKind,
}

impl Column {
    #[must_use]
    pub fn holding(date: &DisclosureDate, measure: Measure) -> Self {
        Self {
            name: format!("{HOLDING_PREFIX} {date} - {}", measure.label()),
            kind: ColumnKind::Holding {
                date: date.clone(),
                measure,
            },
        }
    }

    #[must_use]
    pub fn labeled(label: &str, rules: &ColumnRules) -> Self {
        Self {
            name: label.trim().to_string(),
            kind: rules.classify(label),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn kind(&self) -> &ColumnKind {
        &self.kind
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ColumnSpec {
    columns: Vec<Column>,
}

impl ColumnSpec {
    #[must_use]
    pub fn new(columns: Vec<Column>) -> Self {
        Self { columns }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.columns.iter().map(Column::name).collect()
    }

    #[must_use]
    pub fn position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column.name == name)
    }

    fn position_of_kind(&self, kind: &ColumnKind) -> Option<usize> {
        self.columns.iter().position(|column| &column.kind == kind)
    }

    #[must_use]
    pub fn sequence_index(&self) -> Option<usize> {
        self.position_of_kind(&ColumnKind::Sequence)
    }

    #[must_use]
    pub fn grouping_index(&self, field: GroupingField) -> Option<usize> {
        self.position_of_kind(&ColumnKind::Grouping(field))
    }

    /// Issuer code column, or the issuer name when the layout has no code.
    #[must_use]
    pub fn issuer_key_index(&self) -> Option<usize> {
        self.grouping_index(GroupingField::IssuerCode)
            .or_else(|| self.grouping_index(GroupingField::IssuerName))
    }

    /// Sequence and grouping columns, the ones forward-filled.
    #[must_use]
    pub fn fill_indices(&self) -> Vec<usize> {
        self.columns
            .iter()
            .enumerate()
            .filter(|(_, column)| {
                matches!(column.kind, ColumnKind::Sequence | ColumnKind::Grouping(_))
            })
            .map(|(index, _)| index)
            .collect()
    }

    /// Columns of one measure, oldest disclosure date first. Falls back to
    /// schema order when any date could not be parsed.
    #[must_use]
    pub fn holding_indices(&self, measure: Measure) -> Vec<usize> {
        let mut found = self
            .columns
            .iter()
            .enumerate()
            .filter_map(|(index, column)| match &column.kind {
                ColumnKind::Holding { date, measure: m } if *m == measure => {
                    Some((index, date.date()))
                }
                _ => None,
            })
            .collect::<Vec<_>>();

        if found.iter().all(|(_, date)| date.is_some()) {
            found.sort_by_key(|(_, date)| *date);
        }
        found.into_iter().map(|(index, _)| index).collect()
    }

    #[must_use]
    pub fn numeric_indices(&self, policy: NumericColumns) -> Vec<usize> {
        let start = match policy {
            NumericColumns::HoldingBlock => self
                .columns
                .iter()
                .position(|column| matches!(column.kind, ColumnKind::Holding { .. }))
                .unwrap_or(self.columns.len()),
            NumericColumns::Trailing(count) => self.columns.len().saturating_sub(count),
        };
        (start..self.columns.len()).collect()
    }

    pub(crate) fn select(&self, indices: &[usize]) -> Self {
        Self {
            columns: indices
                .iter()
                .filter_map(|&index| self.columns.get(index).cloned())
                .collect(),
        }
    }
}
