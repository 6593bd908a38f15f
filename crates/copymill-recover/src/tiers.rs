//! Cascading recovery tiers
//!
//! Converts an arbitrary backend response into a [`GenerationResponse`]:
//! 1. markdown-only detection (no JSON expected),
//! 2. strict parse of the fence-stripped payload,
//! 3. boundary extraction between the first `{` and last `}`,
//! 4. pattern search over brace-delimited candidates, longest first,
//! 5. field-level regex recovery with escape-sequence decoding,
//! 6. whole-response fallback with synthesized meta fields.
//!
//! Each tier is a pure `&str -> Option<RawFields>` function; a tier is
//! attempted only when the previous one yields nothing usable.

use crate::normalize::normalize;
use crate::response::{fallback_description, fallback_title, GenerationResponse};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

/// Most `{` / `}` positions considered by the candidate scan. Keeps the
/// pattern search bounded on pathological inputs.
const MAX_BRACE_POSITIONS: usize = 8;

/// Partially recovered fields, before finalization.
#[derive(Debug, Default, Deserialize)]
struct RawFields {
    #[serde(default)]
    content: Option<String>,
    #[serde(default, rename = "metaSeoTitle", alias = "meta_seo_title")]
    meta_seo_title: Option<String>,
    #[serde(default, rename = "metaDescription", alias = "meta_description")]
    meta_description: Option<String>,
}

impl RawFields {
    fn has_content(&self) -> bool {
        self.content.as_deref().is_some_and(|c| !c.trim().is_empty())
    }

    fn has_any_field(&self) -> bool {
        self.has_content()
            || self
                .meta_seo_title
                .as_deref()
                .is_some_and(|t| !t.trim().is_empty())
            || self
                .meta_description
                .as_deref()
                .is_some_and(|d| !d.trim().is_empty())
    }
}

/// Recover a [`GenerationResponse`] from a raw backend response.
///
/// Infallible: every input produces a response with non-empty `content`.
/// `keyword` seeds the deterministic meta fallbacks and the empty-input
/// placeholder.
#[must_use]
pub fn recover(raw: &str, keyword: &str) -> GenerationResponse {
    let trimmed = raw.trim();

    let fields = if trimmed.is_empty() {
        tracing::debug!("empty backend response, using keyword fallback");
        RawFields::default()
    } else if looks_like_markdown(trimmed) {
        // Legacy/raw outputs predate the JSON contract.
        tracing::debug!("markdown-only response detected, skipping JSON tiers");
        RawFields {
            content: Some(raw.to_string()),
            ..RawFields::default()
        }
    } else {
        strict_parse(trimmed)
            .or_else(|| boundary_extract(trimmed))
            .or_else(|| candidate_scan(trimmed))
            .or_else(|| field_regex_recover(raw))
            .unwrap_or_else(|| {
                tracing::debug!("all recovery tiers failed, treating response as content");
                RawFields {
                    content: Some(raw.to_string()),
                    ..RawFields::default()
                }
            })
    };

    finalize(fields, raw, keyword)
}

/// Tier 1 predicate: the payload is plain markdown, not JSON.
fn looks_like_markdown(trimmed: &str) -> bool {
    trimmed.starts_with('#') && !trimmed.starts_with('{')
}

/// Tier 2: strip surrounding code fences and parse the whole payload.
fn strict_parse(trimmed: &str) -> Option<RawFields> {
    let cleaned = strip_outer_fences(trimmed);
    parse_fields(cleaned).filter(RawFields::has_content)
}

/// Tier 3: parse the substring between the first `{` and last `}`.
fn boundary_extract(trimmed: &str) -> Option<RawFields> {
    let start = trimmed.find('{')?;
    let end = trimmed.rfind('}')?;
    if end <= start {
        return None;
    }
    parse_fields(&trimmed[start..=end]).filter(RawFields::has_content)
}

/// Tier 4: try brace-delimited candidates containing a field marker,
/// longest first, accepting the first that parses with any field.
fn candidate_scan(trimmed: &str) -> Option<RawFields> {
    const MARKERS: [&str; 3] = ["\"content\"", "\"metaSeoTitle\"", "\"metaDescription\""];

    let opens: Vec<usize> = trimmed
        .match_indices('{')
        .map(|(i, _)| i)
        .take(MAX_BRACE_POSITIONS)
        .collect();
    let mut closes: Vec<usize> = trimmed.match_indices('}').map(|(i, _)| i).collect();
    if closes.len() > MAX_BRACE_POSITIONS {
        closes = closes.split_off(closes.len() - MAX_BRACE_POSITIONS);
    }

    let mut candidates: Vec<&str> = Vec::new();
    for &open in &opens {
        for &close in &closes {
            if close > open {
                let candidate = &trimmed[open..=close];
                if MARKERS.iter().any(|m| candidate.contains(m)) {
                    candidates.push(candidate);
                }
            }
        }
    }
    candidates.sort_by_key(|c| std::cmp::Reverse(c.len()));

    candidates
        .into_iter()
        .find_map(|c| parse_fields(c).filter(RawFields::has_any_field))
}

/// Tier 5: recover fields independently with string-literal patterns.
///
/// Survives irreparably broken JSON; can return partial results.
fn field_regex_recover(raw: &str) -> Option<RawFields> {
    static CONTENT_RE: Lazy<Regex> = Lazy::new(|| field_pattern("content"));
    static TITLE_RE: Lazy<Regex> = Lazy::new(|| field_pattern("metaSeoTitle"));
    static DESC_RE: Lazy<Regex> = Lazy::new(|| field_pattern("metaDescription"));
    // Truncated output: the closing quote of `content` never arrived.
    static CONTENT_OPEN_RE: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r#""content"\s*:\s*"((?:[^"\\]|\\.)+)\s*$"#).expect("valid field regex")
    });

    let capture = |re: &Regex| {
        re.captures(raw)
            .map(|caps| unescape_json(&caps[1]))
            .filter(|v| !v.trim().is_empty())
    };

    let fields = RawFields {
        content: capture(&CONTENT_RE).or_else(|| capture(&CONTENT_OPEN_RE)),
        meta_seo_title: capture(&TITLE_RE),
        meta_description: capture(&DESC_RE),
    };

    fields.has_any_field().then_some(fields)
}

/// Finalization shared by all tiers: normalize content, guarantee it is
/// non-empty, fill missing meta fields from the keyword templates.
fn finalize(fields: RawFields, raw: &str, keyword: &str) -> GenerationResponse {
    let RawFields {
        content,
        meta_seo_title,
        meta_description,
    } = fields;

    // A candidate that exposed only meta fields still needs content:
    // first the field-level pattern, then the cleaned raw text.
    let content_raw = content
        .filter(|c| !c.trim().is_empty())
        .or_else(|| {
            field_regex_recover(raw).and_then(|f| f.content)
        })
        .unwrap_or_else(|| raw.to_string());

    let mut content = normalize(&content_raw);
    if content.is_empty() {
        content = format!("<p>{}</p>", fallback_description(keyword));
    }

    GenerationResponse {
        content,
        meta_seo_title: non_empty(meta_seo_title).unwrap_or_else(|| fallback_title(keyword)),
        meta_description: non_empty(meta_description)
            .unwrap_or_else(|| fallback_description(keyword)),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_fields(payload: &str) -> Option<RawFields> {
    serde_json::from_str::<RawFields>(payload).ok()
}

fn field_pattern(name: &str) -> Regex {
    Regex::new(&format!(r#""{name}"\s*:\s*"((?:[^"\\]|\\.)*)""#)).expect("valid field regex")
}

/// Strip a surrounding ```/```json fence pair, if present.
fn strip_outer_fences(payload: &str) -> &str {
    let trimmed = payload.trim();
    let Some(rest) = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
    else {
        return trimmed;
    };
    rest.trim().trim_end_matches("```").trim()
}

/// Decode the escape sequences JSON string literals carry.
pub(crate) fn unescape_json(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some('/') => out.push('/'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}
