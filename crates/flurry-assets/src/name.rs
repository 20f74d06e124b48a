//! Asset name normalization and path encoding.

use std::collections::HashSet;

use flurry_core::ASSET_DIRECTORY;

/// Clean up a raw candidate (an href, a manifest entry, a file name) into a
/// relative asset name. Returns an empty string when nothing is left.
pub fn normalize_asset_name(candidate: &str) -> String {
    let mut sanitized = candidate.trim();
    while let Some(rest) = sanitized.strip_prefix("./") {
        sanitized = rest;
    }
    while let Some(rest) = sanitized.strip_prefix(".\\") {
        sanitized = rest;
    }
    sanitized = sanitized.trim_start_matches('/');
    if let Some(rest) = sanitized.strip_prefix(ASSET_DIRECTORY) {
        sanitized = rest;
    }
    let clean = sanitized
        .split(['?', '#'])
        .next()
        .unwrap_or_default();
    percent_decode(clean).unwrap_or_else(|| clean.to_string())
}

/// Normalize every entry and keep the valid, unique `.png` names in order.
pub fn unique_png_names<I, S>(entries: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    let mut names = Vec::new();
    for entry in entries {
        let normalized = normalize_asset_name(entry.as_ref());
        if normalized.is_empty()
            || normalized.contains("..")
            || !is_png(&normalized)
            || seen.contains(&normalized)
        {
            continue;
        }
        seen.insert(normalized.clone());
        names.push(normalized);
    }
    names
}

fn is_png(name: &str) -> bool {
    name.to_ascii_lowercase().ends_with(".png")
}

/// Percent-encode each `/`-separated segment of `path`.
pub fn encode_asset_path(path: &str) -> String {
    path.split('/')
        .map(encode_component)
        .collect::<Vec<_>>()
        .join("/")
}

/// Characters left as-is when encoding a path segment.
fn is_unreserved(byte: u8) -> bool {
    byte.is_ascii_alphanumeric()
        || matches!(byte, b'-' | b'_' | b'.' | b'!' | b'~' | b'*' | b'\'' | b'(' | b')')
}

fn encode_component(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    for byte in segment.bytes() {
        if is_unreserved(byte) {
            out.push(byte as char);
        } else {
            out.push_str(&format!("%{byte:02X}"));
        }
    }
    out
}

/// Decode `%XX` escapes. Returns `None` for a malformed escape or when the
/// decoded bytes are not UTF-8.
fn percent_decode(input: &str) -> Option<String> {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = bytes.get(i + 1..i + 3)?;
            if !hex.iter().all(u8::is_ascii_hexdigit) {
                return None;
            }
            let hex = std::str::from_utf8(hex).ok()?;
            out.push(u8::from_str_radix(hex, 16).ok()?);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    String::from_utf8(out).ok()
}
