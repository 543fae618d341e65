//! Page table extraction: the contract the pipeline consumes, a text-layout
//! implementation over PDF page text, and a JSON grid loader for tables
//! extracted elsewhere.

use std::io::Read;

use tracing::trace;

use crate::error::ExtractError;
use crate::model::{ExtractedPage, PageTable, PageText, RawRow};
use crate::options::ExtractOptions;
use crate::table_parse::{slice_at_columns, split_line_with_offsets};

pub trait PageTableExtractor {
    /// The page's table as a rectangular grid, or `None` when the page has
    /// no table.
    fn extract_table(&self, page: &PageText) -> Option<PageTable>;

    fn extract_pages(&self, pages: &[PageText]) -> Vec<ExtractedPage> {
        pages
            .iter()
            .map(|page| ExtractedPage {
                page_number: page.page_number,
                table: self.extract_table(page),
            })
            .collect()
    }
}

/// Reads a table off the text layout of a page.
///
/// The first line with at least `min_cols` cells is the header line. A
/// following line without digits is its sub-header; the cell offsets of both
/// become column boundaries for every later line, so a label spanning
/// several sub-columns lands in the first of them.
///
/// Every table starts with exactly `header_rows` rows: the header line, the
/// sub-header line when present, then blank rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextGridExtractor {
    pub min_cols: usize,
    pub header_rows: usize,
}

impl Default for TextGridExtractor {
    fn default() -> Self {
        Self::from_options(&ExtractOptions::default())
    }
}

impl TextGridExtractor {
    #[must_use]
    pub fn from_options(options: &ExtractOptions) -> Self {
        Self {
            min_cols: options.min_cols,
            header_rows: options.header_rows,
        }
    }
}

/// Puts each cell in the column whose boundary precedes it.
fn place_cells(cells: Vec<(usize, String)>, starts: &[usize]) -> RawRow {
    let mut row: RawRow = vec![None; starts.len()];
    for (start, text) in cells {
        let index = starts.partition_point(|&bound| bound <= start).saturating_sub(1);
        match &mut row[index] {
            Some(existing) => {
                existing.push(' ');
                existing.push_str(&text);
            }
            empty => *empty = Some(text),
        }
    }
    row
}

impl PageTableExtractor for TextGridExtractor {
    fn extract_table(&self, page: &PageText) -> Option<PageTable> {
        let mut lines = page
            .text
            .lines()
            .filter(|line| !line.trim().is_empty())
            .peekable();

        let header = lines.by_ref().find_map(|line| {
            let cells = split_line_with_offsets(line);
            (cells.len() >= self.min_cols.max(2)).then_some(cells)
        })?;
        let sub_header = lines.next_if(|line| !line.chars().any(|ch| ch.is_ascii_digit()));

        let mut starts = header.iter().map(|(start, _)| *start).collect::<Vec<_>>();
        if let Some(line) = sub_header {
            starts.extend(split_line_with_offsets(line).into_iter().map(|(start, _)| start));
            starts.sort_unstable();
            starts.dedup();
        }

        let mut rows = vec![place_cells(header, &starts)];
        if let Some(line) = sub_header {
            rows.push(slice_at_columns(line, &starts));
        }
        let header_rows = self.header_rows.max(1);
        rows.truncate(header_rows);
        rows.resize(header_rows, vec![None; starts.len()]);

        for line in lines {
            let row = slice_at_columns(line, &starts);
            if row.iter().filter(|cell| cell.is_some()).count() < 2 {
                trace!(page = page.page_number, line, "ignoring non-table line");
                continue;
            }
            rows.push(row);
        }

        Some(PageTable::new(rows))
    }
}

/// Loads grids produced by an external table extractor: a JSON array with one
/// entry per page, `null` or an array of rows of `string | null`.
pub fn load_page_grids_json<R: Read>(reader: R) -> Result<Vec<ExtractedPage>, ExtractError> {
    let pages: Vec<Option<Vec<RawRow>>> = serde_json::from_reader(reader)?;

    pages
        .into_iter()
        .enumerate()
        .map(|(index, rows)| {
            let page_number = u32::try_from(index + 1).map_err(|_| {
                ExtractError::InvalidOption("too many pages in grid input".to_string())
            })?;
            Ok(ExtractedPage {
                page_number,
                table: rows.filter(|rows| !rows.is_empty()).map(PageTable::new),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{PageTableExtractor, TextGridExtractor, load_page_grids_json};
    use crate::model::PageText;

    fn page(text: &str) -> PageText {
        PageText {
            page_number: 2,
            text: text.to_string(),
        }
    }

    #[test]
    fn reads_rectangular_grid_from_text_layout() {
        let text = "\
Daftar Pemegang Saham
No  Kode Efek  Nama Emiten
1   AAAA       Alpha Tbk
    BBBB       Beta Tbk
Halaman 2";

        let table = TextGridExtractor::default()
            .extract_table(&page(text))
            .expect("table should be detected");

        assert_eq!(table.rows.len(), 4);
        assert_eq!(table.rows[1], vec![None, None, None]);
        assert_eq!(
            table.rows[2],
            vec![
                Some("1".to_string()),
                Some("AAAA".to_string()),
                Some("Alpha Tbk".to_string())
            ]
        );
        assert_eq!(table.rows[3][0], None);
    }

    #[test]
    fn header_region_matches_configured_height() {
        let text = "\
No  Kode Efek  Nama Emiten
    Kode       Nama
1   AAAA       Alpha Tbk";

        let single = TextGridExtractor {
            min_cols: 3,
            header_rows: 1,
        }
        .extract_table(&page(text))
        .expect("table should be detected");
        assert_eq!(single.rows.len(), 2);
        assert_eq!(single.rows[1][1].as_deref(), Some("AAAA"));

        let padded = TextGridExtractor {
            min_cols: 3,
            header_rows: 3,
        }
        .extract_table(&page(text))
        .expect("table should be detected");
        assert_eq!(padded.rows.len(), 4);
        assert_eq!(padded.rows[1][1].as_deref(), Some("Kode"));
        assert!(padded.rows[2].iter().all(Option::is_none));
        assert_eq!(padded.rows[3][1].as_deref(), Some("AAAA"));
    }

    #[test]
    fn sub_header_splits_spanning_date_label() {
        let text = "\
No  Kode Efek  Kepemilikan Per 15-DEC-2025
               Jumlah     Gabungan  Persen
1   AAAA       1,000      1,000     5.00%";

        let table = TextGridExtractor::default()
            .extract_table(&page(text))
            .expect("table should be detected");

        assert_eq!(table.rows.len(), 3);
        assert_eq!(
            table.rows[0],
            vec![
                Some("No".to_string()),
                Some("Kode Efek".to_string()),
                Some("Kepemilikan Per 15-DEC-2025".to_string()),
                None,
                None
            ]
        );
        assert_eq!(table.rows[1][0], None);
        assert_eq!(table.rows[2][4].as_deref(), Some("5.00%"));
    }

    #[test]
    fn narrative_page_has_no_table() {
        let table = TextGridExtractor::default()
            .extract_table(&page("This is plain narrative text without columns."));
        assert!(table.is_none());
    }

    #[test]
    fn loads_json_grids_with_missing_tables() {
        let json = r#"[
            null,
            [["No", "Kode Efek"], [null, null], ["1", "AAAA"]],
            []
        ]"#;

        let pages = load_page_grids_json(json.as_bytes()).expect("grid json should parse");
        assert_eq!(pages.len(), 3);
        assert!(pages[0].table.is_none());
        assert_eq!(pages[1].page_number, 2);
        assert_eq!(pages[1].table.as_ref().map(|table| table.rows.len()), Some(3));
        assert!(pages[2].table.is_none());
    }
}
