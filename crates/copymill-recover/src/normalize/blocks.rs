//! Block-level conversion: lists and blockquotes.

use once_cell::sync::Lazy;
use regex::Regex;

static ORDERED_ITEM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[ \t]*\d+[.)][ \t]+(.*)$").expect("valid ordered-item regex"));

fn bullet_item(line: &str) -> Option<&str> {
    let t = line.trim_start();
    ["- ", "* ", "+ "]
        .iter()
        .find_map(|marker| t.strip_prefix(marker))
        .map(str::trim)
}

fn ordered_item(line: &str) -> Option<String> {
    ORDERED_ITEM
        .captures(line)
        .map(|caps| caps[1].trim().to_string())
}

/// Convert consecutive bullet lines to `<ul>` and numbered lines to
/// `<ol>`, one `<li>` per line. Lists are kept flat.
pub(crate) fn convert_lists(text: &str) -> String {
    let lines: Vec<&str> = text.lines().collect();
    let mut out: Vec<String> = Vec::with_capacity(lines.len());
    let mut i = 0;

    while i < lines.len() {
        if bullet_item(lines[i]).is_some() {
            let mut items = Vec::new();
            while i < lines.len() {
                let Some(item) = bullet_item(lines[i]) else {
                    break;
                };
                items.push(item.to_string());
                i += 1;
            }
            out.push(render_list("ul", &items));
        } else if ordered_item(lines[i]).is_some() {
            let mut items = Vec::new();
            while i < lines.len() {
                let Some(item) = ordered_item(lines[i]) else {
                    break;
                };
                items.push(item);
                i += 1;
            }
            out.push(render_list("ol", &items));
        } else {
            out.push(lines[i].to_string());
            i += 1;
        }
    }

    out.join("\n")
}

fn render_list(tag: &str, items: &[String]) -> String {
    let mut html = format!("<{tag}>\n");
    for item in items {
        html.push_str(&format!("<li>{item}</li>\n"));
    }
    html.push_str(&format!("</{tag}>"));
    html
}

/// Convert runs of `>` lines into a single `<blockquote>`.
pub(crate) fn convert_blockquotes(text: &str) -> String {
    let lines: Vec<&str> = text.lines().collect();
    let mut out: Vec<String> = Vec::with_capacity(lines.len());
    let mut i = 0;

    while i < lines.len() {
        if let Some(first) = quoted_line(lines[i]) {
            let mut parts = vec![first.to_string()];
            i += 1;
            while i < lines.len() {
                let Some(part) = quoted_line(lines[i]) else {
                    break;
                };
                parts.push(part.to_string());
                i += 1;
            }
            out.push(format!("<blockquote>{}</blockquote>", parts.join(" ")));
        } else {
            out.push(lines[i].to_string());
            i += 1;
        }
    }

    out.join("\n")
}

fn quoted_line(line: &str) -> Option<&str> {
    line.trim_start()
        .strip_prefix('>')
        .map(|rest| rest.strip_prefix(' ').unwrap_or(rest).trim_end())
}
