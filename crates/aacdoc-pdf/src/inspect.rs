//! Read tables back out of generated markup
//!
//! The counterpart of the DOCX body reader: tables as rows of cell text,
//! with line breaks inside a cell turned into `\n`. Only markup produced by
//! [`crate::Transpiler`] is understood.

/// All tables in generated markup, in order. Header rows come first.
pub fn tables(markup: &str) -> Vec<Vec<Vec<String>>> {
    let mut found = Vec::new();
    let mut current: Option<Vec<Vec<String>>> = None;

    for line in markup.lines() {
        if line == "#table(" {
            current = Some(Vec::new());
            continue;
        }
        if line == ")" {
            if let Some(rows) = current.take() {
                found.push(rows);
            }
            continue;
        }
        if let Some(rows) = current.as_mut() {
            if line.starts_with("  [") || line.starts_with("  table.header(") {
                rows.push(row_cells(line));
            }
        }
    }

    found
}

/// Split one row line into cell texts
fn row_cells(line: &str) -> Vec<String> {
    let mut cells = Vec::new();
    let mut text = String::new();
    let mut depth = 0usize;
    let mut chars = line.char_indices();

    while let Some((i, c)) = chars.next() {
        match c {
            '"' if depth > 0 => text.push_str(&read_literal(&mut chars)),
            '#' if depth > 0 && line[i..].starts_with("#linebreak()") => {
                text.push('\n');
                for _ in 0.."linebreak()".len() {
                    chars.next();
                }
            }
            '[' => depth += 1,
            ']' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    cells.push(std::mem::take(&mut text));
                }
            }
            _ => {}
        }
    }

    cells
}

/// Decode a string literal whose opening quote was already consumed
fn read_literal<I>(chars: &mut I) -> String
where
    I: Iterator<Item = (usize, char)>,
{
    let mut out = String::new();
    while let Some((_, c)) = chars.next() {
        match c {
            '"' => break,
            '\\' => match chars.next().map(|(_, c)| c) {
                Some('n') => out.push('\n'),
                Some('r') => out.push('\r'),
                Some('t') => out.push('\t'),
                Some(other) => out.push(other),
                None => break,
            },
            _ => out.push(c),
        }
    }
    out
}
