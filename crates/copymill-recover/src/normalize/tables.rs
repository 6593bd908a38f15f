//! Pipe-delimited markdown table conversion.
//!
//! A table is a header row immediately followed by a separator row of
//! dashes/colons (`| --- | :-- |` style). A header without a separator
//! is left as literal text, never guessed into a table.

/// Convert markdown tables into `<table>` markup with header and body
/// sections. Non-table lines pass through untouched.
pub(crate) fn convert_tables(text: &str) -> String {
    let lines: Vec<&str> = text.lines().collect();
    let mut out: Vec<String> = Vec::with_capacity(lines.len());
    let mut i = 0;

    while i < lines.len() {
        if let Some((table, consumed)) = parse_table(&lines[i..]) {
            out.push(table);
            i += consumed;
        } else {
            out.push(lines[i].to_string());
            i += 1;
        }
    }

    out.join("\n")
}

/// A row line starts and ends with `|` after trimming.
fn is_row(line: &str) -> bool {
    let t = line.trim();
    t.len() >= 2 && t.starts_with('|') && t.ends_with('|')
}

/// Separator rows contain only dashes, colons and pipes, with at least
/// one dash per cell.
fn is_separator(line: &str) -> bool {
    if !is_row(line) {
        return false;
    }
    let cs = cells(line);
    !cs.is_empty()
        && cs.iter().all(|c| {
            !c.is_empty() && c.contains('-') && c.chars().all(|ch| ch == '-' || ch == ':')
        })
}

fn cells(line: &str) -> Vec<String> {
    line.trim()
        .trim_start_matches('|')
        .trim_end_matches('|')
        .split('|')
        .map(|c| c.trim().to_string())
        .collect()
}

fn parse_table(lines: &[&str]) -> Option<(String, usize)> {
    if lines.len() < 2 || !is_row(lines[0]) || is_separator(lines[0]) || !is_separator(lines[1]) {
        return None;
    }

    let header = cells(lines[0]);
    let mut consumed = 2;
    let mut body: Vec<Vec<String>> = Vec::new();
    while consumed < lines.len() && is_row(lines[consumed]) && !is_separator(lines[consumed]) {
        body.push(cells(lines[consumed]));
        consumed += 1;
    }

    let mut html = String::from("<table>\n<thead>\n<tr>");
    for cell in &header {
        html.push_str(&format!("<th>{cell}</th>"));
    }
    html.push_str("</tr>\n</thead>\n<tbody>\n");
    for row in &body {
        html.push_str("<tr>");
        for cell in row {
            html.push_str(&format!("<td>{cell}</td>"));
        }
        html.push_str("</tr>\n");
    }
    html.push_str("</tbody>\n</table>");

    Some((html, consumed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn converts_simple_table() {
        let out = convert_tables("| A | B |\n|---|---|\n| 1 | 2 |");
        assert_eq!(
            out,
            "<table>\n<thead>\n<tr><th>A</th><th>B</th></tr>\n</thead>\n\
             <tbody>\n<tr><td>1</td><td>2</td></tr>\n</tbody>\n</table>"
        );
    }

    #[test]
    fn accepts_alignment_separators() {
        let out = convert_tables("| A | B |\n| :-- | --: |\n| 1 | 2 |");
        assert!(out.contains("<th>A</th>"));
        assert!(out.contains("<td>2</td>"));
    }

    #[test]
    fn header_without_separator_stays_literal() {
        let input = "| A | B |\n| 1 | 2 |";
        assert_eq!(convert_tables(input), input);
    }

    #[test]
    fn surrounding_text_passes_through() {
        let out = convert_tables("before\n| A |\n|---|\n| 1 |\nafter");
        assert!(out.starts_with("before\n<table>"));
        assert!(out.ends_with("</table>\nafter"));
    }

    #[test]
    fn converted_output_is_stable() {
        let once = convert_tables("| A | B |\n|---|---|\n| 1 | 2 |");
        assert_eq!(convert_tables(&once), once);
    }
}
