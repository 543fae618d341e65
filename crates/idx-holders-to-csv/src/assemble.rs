use tracing::{debug, warn};

use crate::error::ExtractError;
use crate::header::reconstruct_header;
use crate::model::{ExtractedPage, RawDataset, RawRow, cell_text, is_blank};
use crate::options::ExtractOptions;
use crate::warning::{ExtractWarning, WarningCode};

/// Concatenates the data rows of every page after the leading pages.
///
/// The header is reconstructed once, from the first page that carries a
/// table. Returns `Ok(None)` when no page carries a table at all.
pub(crate) fn assemble_rows(
    pages: &[ExtractedPage],
    options: &ExtractOptions,
    warnings: &mut Vec<ExtractWarning>,
) -> Result<Option<RawDataset>, ExtractError> {
    let mut dataset: Option<RawDataset> = None;

    for page in pages.iter().skip(options.skip_leading_pages) {
        let Some(table) = page.table.as_ref().filter(|table| !table.is_empty()) else {
            warn!(page = page.page_number, "no table found on page, skipping");
            warnings.push(
                ExtractWarning::new(WarningCode::NoTableOnPage, "no table found on page")
                    .with_page(page.page_number),
            );
            continue;
        };

        let dataset = dataset.get_or_insert_with(|| {
            let layout = reconstruct_header(&table.rows[0], &options.column_rules);
            debug!(
                page = page.page_number,
                columns = layout.columns.len(),
                date_groups = layout.date_groups.len(),
                "reconstructed header"
            );
            RawDataset {
                columns: layout.columns,
                rows: Vec::new(),
            }
        });

        let expected = dataset.columns.len();
        for (offset, row) in table.rows.iter().enumerate().skip(options.header_rows) {
            if row.iter().all(is_blank) {
                continue;
            }
            if row.len() != expected {
                return Err(ExtractError::SchemaCardinalityMismatch {
                    page: page.page_number,
                    row: offset + 1,
                    expected,
                    actual: row.len(),
                    cells: row
                        .iter()
                        .map(|cell| cell.clone().unwrap_or_default())
                        .collect(),
                });
            }
            dataset.rows.push(row.clone());
        }
    }

    if let Some(dataset) = dataset.as_mut() {
        drop_recurring_headers(dataset, warnings);
    }

    Ok(dataset)
}

/// Header rows repeated as data on later pages carry the sequence column's
/// own label in that column.
fn drop_recurring_headers(dataset: &mut RawDataset, warnings: &mut Vec<ExtractWarning>) {
    let Some(index) = dataset.columns.sequence_index() else {
        return;
    };
    let label = dataset.columns.columns()[index].name().to_string();

    let before = dataset.rows.len();
    dataset
        .rows
        .retain(|row: &RawRow| row.get(index).and_then(cell_text) != Some(label.as_str()));
    let dropped = before - dataset.rows.len();

    if dropped > 0 {
        debug!(dropped, "dropped recurring header rows");
        warnings.push(
            ExtractWarning::new(
                WarningCode::RecurringHeaderDropped,
                "dropped header rows repeated as data",
            )
            .with_column(label)
            .with_count(dropped),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::assemble_rows;
    use crate::error::ExtractError;
    use crate::model::{ExtractedPage, PageTable, RawRow};
    use crate::options::ExtractOptions;
    use crate::warning::WarningCode;

    fn row(values: &[Option<&str>]) -> RawRow {
        values.iter().map(|value| value.map(str::to_string)).collect()
    }

    fn header_rows() -> Vec<RawRow> {
        vec![
            row(&[Some("No"), Some("Kode Efek"), Some("Nama Emiten")]),
            row(&[None, None, None]),
        ]
    }

    fn page(page_number: u32, data: &[RawRow]) -> ExtractedPage {
        let mut rows = header_rows();
        rows.extend(data.iter().cloned());
        ExtractedPage {
            page_number,
            table: Some(PageTable::new(rows)),
        }
    }

    #[test]
    fn skips_cover_page_and_concatenates_pages() {
        let pages = vec![
            page(1, &[row(&[Some("99"), Some("COVR"), Some("cover")])]),
            page(2, &[row(&[Some("1"), Some("AAAA"), Some("Alpha")])]),
            ExtractedPage {
                page_number: 3,
                table: None,
            },
            page(
                4,
                &[
                    row(&[Some("2"), Some("BBBB"), Some("Beta")]),
                    row(&[None, Some(" "), Some("None")]),
                ],
            ),
        ];

        let mut warnings = Vec::new();
        let dataset = assemble_rows(&pages, &ExtractOptions::default(), &mut warnings)
            .expect("assembly should succeed")
            .expect("tables present");

        assert_eq!(dataset.rows.len(), 2);
        assert_eq!(dataset.rows[0][1].as_deref(), Some("AAAA"));
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].code, WarningCode::NoTableOnPage);
        assert_eq!(warnings[0].page, Some(3));
    }

    #[test]
    fn drops_header_rows_repeated_as_data() {
        let pages = vec![
            page(1, &[]),
            page(
                2,
                &[
                    row(&[Some("1"), Some("AAAA"), Some("Alpha")]),
                    row(&[Some(" No "), Some("Kode Efek"), Some("Nama Emiten")]),
                    row(&[Some("2"), Some("BBBB"), Some("Beta")]),
                ],
            ),
        ];

        let mut warnings = Vec::new();
        let dataset = assemble_rows(&pages, &ExtractOptions::default(), &mut warnings)
            .expect("assembly should succeed")
            .expect("tables present");

        assert_eq!(dataset.rows.len(), 2);
        assert_eq!(warnings[0].code, WarningCode::RecurringHeaderDropped);
        assert_eq!(warnings[0].count, Some(1));
    }

    #[test]
    fn fails_fast_on_cardinality_mismatch() {
        let pages = vec![
            page(1, &[]),
            page(2, &[row(&[Some("1"), Some("AAAA")])]),
        ];

        let err = assemble_rows(&pages, &ExtractOptions::default(), &mut Vec::new())
            .expect_err("short row should fail");
        match err {
            ExtractError::SchemaCardinalityMismatch {
                page,
                row,
                expected,
                actual,
                cells,
            } => {
                assert_eq!(page, 2);
                assert_eq!(row, 3);
                assert_eq!(expected, 3);
                assert_eq!(actual, 2);
                assert_eq!(cells, vec!["1", "AAAA"]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn returns_none_without_any_table() {
        let pages = vec![
            page(1, &[]),
            ExtractedPage {
                page_number: 2,
                table: None,
            },
        ];

        let result = assemble_rows(&pages, &ExtractOptions::default(), &mut Vec::new())
            .expect("no tables is not an error");
        assert!(result.is_none());
    }
}
