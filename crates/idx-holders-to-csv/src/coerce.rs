use tracing::debug;

use crate::model::{Dataset, RawCell, RawDataset, ShareholderRecord, Value, cell_text};
use crate::schema::NumericColumns;
use crate::warning::{ExtractWarning, WarningCode};

/// Trims, maps blank and literal `None` cells to missing, and strips
/// thousands separators and percent signs.
pub(crate) fn clean_cell(cell: &RawCell) -> Option<String> {
    let text = cell_text(cell)?;
    let cleaned = text.replace([',', '%'], "");
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned)
    }
}

/// Converts the raw row set into typed records.
///
/// Columns in the numeric block always end up as numbers: values that fail
/// to parse, and missing values, become `0`. This conflates "not disclosed"
/// with "disclosed zero"; every affected column is reported as a
/// [`WarningCode::NumericCoercedToZero`] warning.
#[must_use]
pub fn coerce_types(
    raw: RawDataset,
    numeric_columns: NumericColumns,
    warnings: &mut Vec<ExtractWarning>,
) -> Dataset {
    let numeric = raw.columns.numeric_indices(numeric_columns);
    let mut unparseable = vec![0_usize; raw.columns.len()];

    let records = raw
        .rows
        .iter()
        .map(|row| {
            let values = row
                .iter()
                .enumerate()
                .map(|(index, cell)| {
                    let cleaned = clean_cell(cell);
                    if !numeric.contains(&index) {
                        return cleaned.map_or(Value::Missing, Value::Text);
                    }

                    match cleaned.as_deref().map(str::parse::<f64>) {
                        Some(Ok(number)) if number.is_finite() => Value::Number(number),
                        Some(_) => {
                            unparseable[index] += 1;
                            Value::Number(0.0)
                        }
                        None => Value::Number(0.0),
                    }
                })
                .collect();
            ShareholderRecord::new(values)
        })
        .collect();

    for (index, count) in unparseable.into_iter().enumerate() {
        if count == 0 {
            continue;
        }
        let name = raw.columns.columns()[index].name().to_string();
        debug!(column = %name, count, "coerced unparseable numeric cells to zero");
        warnings.push(
            ExtractWarning::new(
                WarningCode::NumericCoercedToZero,
                "unparseable numeric cells coerced to zero",
            )
            .with_column(name)
            .with_count(count),
        );
    }

    Dataset::new(raw.columns, records)
}
