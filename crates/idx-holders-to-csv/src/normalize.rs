use tracing::debug;

use crate::model::{RawDataset, is_blank};
use crate::schema::ColumnKind;
use crate::warning::{ExtractWarning, WarningCode};

/// Drops descriptive and unlabeled columns, then forward-fills the
/// sequence and grouping columns.
#[must_use]
pub fn normalize_columns(dataset: RawDataset, warnings: &mut Vec<ExtractWarning>) -> RawDataset {
    let mut dataset = drop_columns(dataset);
    forward_fill(&mut dataset, warnings);
    dataset
}

fn drop_columns(dataset: RawDataset) -> RawDataset {
    let keep = dataset
        .columns
        .columns()
        .iter()
        .enumerate()
        .filter(|(_, column)| {
            !matches!(
                column.kind(),
                ColumnKind::Descriptive | ColumnKind::Unlabeled
            )
        })
        .map(|(index, _)| index)
        .collect::<Vec<_>>();

    if keep.len() == dataset.columns.len() {
        return dataset;
    }
    debug!(
        dropped = dataset.columns.len() - keep.len(),
        "dropping descriptive and unlabeled columns"
    );

    let rows = dataset
        .rows
        .into_iter()
        .map(|row| {
            keep.iter()
                .filter_map(|&index| row.get(index).cloned())
                .collect()
        })
        .collect();

    RawDataset {
        columns: dataset.columns.select(&keep),
        rows,
    }
}

/// Copies the nearest prior non-blank value into blank cells of every
/// sequence and grouping column.
pub fn forward_fill(dataset: &mut RawDataset, warnings: &mut Vec<ExtractWarning>) {
    for index in dataset.columns.fill_indices() {
        let mut last = None;
        let mut unfilled = 0_usize;

        for row in &mut dataset.rows {
            let Some(cell) = row.get_mut(index) else {
                continue;
            };
            if is_blank(cell) {
                match &last {
                    Some(value) => *cell = Some(String::clone(value)),
                    None => unfilled += 1,
                }
            } else {
                last.clone_from(cell);
            }
        }

        if unfilled > 0 {
            let name = dataset.columns.columns()[index].name().to_string();
            warnings.push(
                ExtractWarning::new(
                    WarningCode::UnfilledGroupingValue,
                    "leading rows have no prior value to forward-fill",
                )
                .with_column(name)
                .with_count(unfilled),
            );
        }
    }
}
