//! Header reconstruction.
//!
//! The first header row of a page is noisy: cells can carry text bleeding in
//! from neighbouring content on earlier lines, and the date-parameterized
//! holding group is sometimes one merged cell and sometimes the first of three
//! separate cells. The reconstruction walks the raw cells with a small state
//! machine and emits the canonical [`ColumnSpec`].

use tracing::debug;

use crate::model::RawCell;
use crate::schema::{Column, ColumnRules, ColumnSpec, DisclosureDate, Measure};

/// Raw header cells absorbed by one date-parameterized group, at most.
const MAX_GROUP_WIDTH: usize = 3;

/// Raw cells consumed for one run of emitted columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawSpan {
    pub start: usize,
    pub width: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderLayout {
    pub columns: ColumnSpec,
    /// One entry per date-parameterized group, in header order.
    pub date_groups: Vec<RawSpan>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HeaderState {
    AwaitingLabel,
    InDateGroupConsuming { start: usize, absorbed: usize },
}

/// Last non-empty line of a cell; only that line is the real label.
fn label_line(raw: &str) -> &str {
    raw.lines()
        .map(str::trim)
        .rfind(|line| !line.is_empty())
        .unwrap_or("")
}

fn is_empty_header_cell(cell: &RawCell) -> bool {
    cell.as_deref().is_none_or(|text| text.trim().is_empty())
}

#[must_use]
pub fn reconstruct_header(header: &[RawCell], rules: &ColumnRules) -> HeaderLayout {
    let mut columns = Vec::new();
    let mut date_groups = Vec::new();
    let mut state = HeaderState::AwaitingLabel;

    let mut index = 0;
    while index < header.len() {
        let cell = &header[index];
        match state {
            HeaderState::InDateGroupConsuming { start, absorbed } => {
                if absorbed < MAX_GROUP_WIDTH && is_empty_header_cell(cell) {
                    let absorbed = absorbed + 1;
                    index += 1;
                    state = if absorbed == MAX_GROUP_WIDTH {
                        date_groups.push(RawSpan {
                            start,
                            width: absorbed,
                        });
                        HeaderState::AwaitingLabel
                    } else {
                        HeaderState::InDateGroupConsuming { start, absorbed }
                    };
                } else {
                    // Not part of the group; the same cell is read again as a label.
                    date_groups.push(RawSpan {
                        start,
                        width: absorbed,
                    });
                    state = HeaderState::AwaitingLabel;
                }
            }
            HeaderState::AwaitingLabel => {
                let raw = cell.as_deref().unwrap_or("").trim();
                let label = label_line(raw);
                let date = DisclosureDate::find(label).or_else(|| DisclosureDate::find(raw));

                if let Some(date) = date {
                    debug!(column = index, date = %date, "date-parameterized header group");
                    columns.extend(Measure::ALL.map(|measure| Column::holding(&date, measure)));
                    state = HeaderState::InDateGroupConsuming {
                        start: index,
                        absorbed: 1,
                    };
                } else if !label.is_empty() {
                    columns.push(Column::labeled(label, rules));
                }
                index += 1;
            }
        }
    }

    if let HeaderState::InDateGroupConsuming { start, absorbed } = state {
        date_groups.push(RawSpan {
            start,
            width: absorbed,
        });
    }

    HeaderLayout {
        columns: ColumnSpec::new(columns),
        date_groups,
    }
}
