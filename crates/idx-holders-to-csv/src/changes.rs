use std::collections::BTreeSet;

use tracing::debug;

use crate::error::ExtractError;
use crate::model::{Dataset, ShareholderRecord};
use crate::schema::{GroupingField, Measure};

/// Issuer keys whose ownership percentage moved between the two most recent
/// disclosure dates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeSet {
    pub previous_column: String,
    pub current_column: String,
    issuer_column: usize,
    changed: BTreeSet<String>,
}

impl ChangeSet {
    #[must_use]
    pub fn changed_issuers(&self) -> &BTreeSet<String> {
        &self.changed
    }

    #[must_use]
    pub fn is_changed(&self, issuer: &str) -> bool {
        self.changed.contains(issuer)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.changed.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.changed.is_empty()
    }

    fn issuer_of<'a>(&self, record: &'a ShareholderRecord) -> Option<&'a str> {
        record.get(self.issuer_column).and_then(|value| value.as_text())
    }

    /// Every record whose issuer is flagged, same schema as `dataset`.
    #[must_use]
    pub fn changed_subset(&self, dataset: &Dataset) -> Dataset {
        dataset.filtered(|record| self.issuer_of(record).is_some_and(|key| self.is_changed(key)))
    }
}

/// Exact comparison after coercion; two missing values compare equal as zero.
#[allow(clippy::float_cmp)]
pub fn detect_changes(dataset: &Dataset) -> Result<ChangeSet, ExtractError> {
    let columns = dataset.columns();
    let percentages = columns.holding_indices(Measure::Percentage);
    let &[.., previous, current] = percentages.as_slice() else {
        return Err(ExtractError::InsufficientPercentageColumns {
            found: percentages.len(),
        });
    };
    let issuer_column = columns
        .issuer_key_index()
        .ok_or(ExtractError::MissingColumn {
            role: GroupingField::IssuerCode.role(),
        })?;

    let mut changed = BTreeSet::new();
    for record in dataset.records() {
        let Some(issuer) = record.get(issuer_column).and_then(|value| value.as_text()) else {
            continue;
        };
        let before = record.get(previous).map_or(0.0, |value| value.number_or_zero());
        let after = record.get(current).map_or(0.0, |value| value.number_or_zero());
        if before != after {
            changed.insert(issuer.to_string());
        }
    }

    let names = columns.names();
    debug!(
        previous = names[previous],
        current = names[current],
        changed = changed.len(),
        "detected ownership changes"
    );

    Ok(ChangeSet {
        previous_column: names[previous].to_string(),
        current_column: names[current].to_string(),
        issuer_column,
        changed,
    })
}
