use crate::model::RawCell;

/// Splits a line on tabs or runs of two or more spaces, keeping the char
/// offset where each cell starts.
pub(crate) fn split_line_with_offsets(line: &str) -> Vec<(usize, String)> {
    fn flush(current: &mut String, start: usize, cells: &mut Vec<(usize, String)>) {
        let text = current.trim();
        if !text.is_empty() {
            cells.push((start, text.to_string()));
        }
        current.clear();
    }

    let mut cells = Vec::new();
    let mut current = String::new();
    let mut start = 0_usize;
    let mut whitespace_run = 0_usize;

    for (offset, ch) in line.chars().enumerate() {
        if ch == '\t' {
            flush(&mut current, start, &mut cells);
            whitespace_run = 0;
            continue;
        }

        if ch.is_whitespace() {
            whitespace_run += 1;
            if whitespace_run >= 2 {
                flush(&mut current, start, &mut cells);
            } else {
                current.push(' ');
            }
            continue;
        }

        if current.trim().is_empty() {
            current.clear();
            start = offset;
        }
        whitespace_run = 0;
        current.push(ch);
    }

    flush(&mut current, start, &mut cells);
    cells
}

pub(crate) fn split_line_into_cells(line: &str) -> Vec<String> {
    split_line_with_offsets(line)
        .into_iter()
        .map(|(_, cell)| cell)
        .collect()
}

/// Cuts `line` at the given column starts. A cut that would land inside a
/// word is moved back to the whitespace before it.
pub(crate) fn slice_at_columns(line: &str, starts: &[usize]) -> Vec<RawCell> {
    let chars = line.chars().collect::<Vec<_>>();
    let mut bounds = Vec::with_capacity(starts.len() + 1);
    bounds.push(0);

    for &start in starts.iter().skip(1) {
        let floor = bounds.last().copied().unwrap_or(0);
        let mut cut = start.min(chars.len()).max(floor);
        while cut > floor
            && cut < chars.len()
            && !chars[cut - 1].is_whitespace()
            && !chars[cut].is_whitespace()
        {
            cut -= 1;
        }
        bounds.push(cut);
    }
    bounds.push(chars.len());

    bounds
        .windows(2)
        .map(|window| {
            let text = chars[window[0]..window[1]]
                .iter()
                .collect::<String>()
                .trim()
                .to_string();
            (!text.is_empty()).then_some(text)
        })
        .collect()
}
