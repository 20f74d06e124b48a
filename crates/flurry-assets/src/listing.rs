//! Parsing of directory listings and manifest files.

use serde_json::Value;

use crate::error::Result;
use crate::name::unique_png_names;

/// Extract icon names from a fetched directory listing.
///
/// A JSON body (array, or object with an `icons` array) is used as-is. Any
/// other body is searched for `<a href>` anchors first and scanned for bare
/// `*.png` runs when no anchor yields a name.
pub fn parse_listing(content_type: Option<&str>, body: &str) -> Vec<String> {
    if content_type.is_some_and(|ct| ct.contains("application/json")) {
        return serde_json::from_str::<Value>(body)
            .ok()
            .and_then(|value| json_entries(&value).map(unique_png_names))
            .unwrap_or_default();
    }
    let from_anchors = unique_png_names(anchor_hrefs(body));
    if !from_anchors.is_empty() {
        return from_anchors;
    }
    unique_png_names(png_runs(body))
}

/// Extract icon names from a manifest: a JSON array, or an object whose
/// `icons` array lists the names. Other shapes yield no names.
pub fn parse_manifest(body: &str) -> Result<Vec<String>> {
    let value: Value = serde_json::from_str(body)?;
    Ok(json_entries(&value)
        .map(unique_png_names)
        .unwrap_or_default())
}

fn json_entries(value: &Value) -> Option<Vec<&str>> {
    let entries = match value {
        Value::Array(items) => items,
        Value::Object(map) => map.get("icons")?.as_array()?,
        _ => return None,
    };
    Some(entries.iter().filter_map(Value::as_str).collect())
}

/// `href` values of every `<a>` tag in an HTML document.
fn anchor_hrefs(html: &str) -> Vec<String> {
    let lower = html.to_ascii_lowercase();
    let mut hrefs = Vec::new();
    let mut cursor = 0;

    while let Some(found) = lower[cursor..].find("<a") {
        let start = cursor + found + 2;
        let Some(end) = lower[start..].find('>').map(|e| start + e) else {
            break;
        };
        cursor = end;
        // `<abbr>` and friends are not anchors.
        if !lower[start..].starts_with(|c: char| c.is_ascii_whitespace()) {
            continue;
        }
        if let Some(href) = attribute(&html[start..end], &lower[start..end], "href") {
            hrefs.push(decode_entities(href));
        }
    }
    hrefs
}

/// Value of attribute `name` inside a tag body. `lower` is the lowercased
/// copy of `tag`, used for the case-insensitive name match.
fn attribute<'a>(tag: &'a str, lower: &str, name: &str) -> Option<&'a str> {
    let mut from = 0;
    while let Some(found) = lower[from..].find(name) {
        let at = from + found;
        from = at + name.len();
        let preceded_by_space = lower[..at]
            .chars()
            .next_back()
            .is_some_and(|c| c.is_ascii_whitespace());
        if !preceded_by_space {
            continue;
        }
        let rest = tag[from..].trim_start();
        let Some(rest) = rest.strip_prefix('=') else {
            continue;
        };
        let rest = rest.trim_start();
        return match rest.chars().next() {
            Some(quote @ ('"' | '\'')) => {
                let inner = &rest[1..];
                Some(inner.find(quote).map_or(inner, |e| &inner[..e]))
            }
            Some(_) => Some(
                rest.split(|c: char| c.is_ascii_whitespace())
                    .next()
                    .unwrap_or_default(),
            ),
            None => None,
        };
    }
    None
}

fn decode_entities(value: &str) -> String {
    value
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

/// Runs of non-space, non-quote characters ending in `.png` (any case).
fn png_runs(text: &str) -> Vec<&str> {
    text.split(|c: char| c.is_whitespace() || c == '"' || c == '\'')
        .filter_map(|token| {
            let lower = token.to_ascii_lowercase();
            let at = lower.rfind(".png")?;
            (at > 0).then(|| &token[..at + 4])
        })
        .collect()
}
