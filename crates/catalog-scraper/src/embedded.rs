//! Locates the product JSON object embedded in a product page.
//!
//! The object is inlined in a script, usually on one very long line, and is
//! not wrapped in any stable marker. Two strategies are tried:
//!
//! 1. An object opening with `{"attachments":`. The product object leads
//!    with its gallery, so this is the common case.
//! 2. For each `"fullImage"` key, the enclosing object: walk back over the
//!    preceding `{` positions and accept the first balanced object that
//!    decodes and carries `fullImage` at its top level.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::error::ParseError;

static ATTACHMENTS_START_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\{\s*"attachments"\s*:"#).expect("valid regex"));

/// How far before a `"fullImage"` key an enclosing `{` is searched for.
const MAX_LOOKBEHIND_BYTES: usize = 600_000;

/// How many enclosing-object candidates are tried per `"fullImage"` key.
const MAX_CANDIDATES_PER_KEY: usize = 64;

/// Distinct candidate starts tried across all `"fullImage"` keys.
const MAX_FALLBACK_CANDIDATES: usize = 128;

/// Longest object a candidate scan reads before giving up.
const MAX_OBJECT_BYTES: usize = 1_000_000;

/// Returns the decoded product object embedded in `html`.
///
/// # Errors
///
/// - [`ParseError::MissingBlob`] if no candidate object exists.
/// - [`ParseError::MalformedBlob`] if candidates exist but none decodes to
///   a JSON object.
pub fn extract_product_blob(html: &str) -> Result<Value, ParseError> {
    let mut last_error: Option<String> = None;

    for m in ATTACHMENTS_START_RE.find_iter(html) {
        match decode_object_at(html, m.start()) {
            Ok(value) => return Ok(value),
            Err(reason) => last_error = Some(reason),
        }
    }

    for start in full_image_candidates(html) {
        match decode_object_at(html, start) {
            Ok(value) if value.get("fullImage").is_some() => return Ok(value),
            Ok(_) => {}
            Err(reason) => last_error = Some(reason),
        }
    }

    match last_error {
        Some(reason) => Err(ParseError::MalformedBlob { reason }),
        None => Err(ParseError::MissingBlob),
    }
}

/// Start offsets of the objects that may enclose a `"fullImage"` key, in
/// trial order: keys in page order, nearest `{` first. Each offset appears
/// once, since nested keys share their enclosing objects.
fn full_image_candidates(html: &str) -> Vec<usize> {
    let mut seen = HashSet::new();
    let mut starts = Vec::new();

    'keys: for (key_pos, _) in html.match_indices("\"fullImage\"") {
        let floor = key_pos.saturating_sub(MAX_LOOKBEHIND_BYTES);
        let mut end = key_pos;

        for _ in 0..MAX_CANDIDATES_PER_KEY {
            let Some(start) = html[..end].rfind('{') else {
                break;
            };
            if start < floor {
                break;
            }
            end = start;

            if seen.insert(start) {
                starts.push(start);
                if starts.len() >= MAX_FALLBACK_CANDIDATES {
                    break 'keys;
                }
            }
        }
    }

    starts
}

/// Decodes the balanced object starting at byte `start`, reading at most
/// [`MAX_OBJECT_BYTES`]. The error string describes why no object could be
/// read there.
fn decode_object_at(html: &str, start: usize) -> Result<Value, String> {
    let mut stop = start.saturating_add(MAX_OBJECT_BYTES).min(html.len());
    while !html.is_char_boundary(stop) {
        stop -= 1;
    }
    let raw = extract_balanced_object(&html[start..stop])
        .ok_or_else(|| format!("unterminated object at byte {start}"))?;
    match serde_json::from_str::<Value>(raw) {
        Ok(value @ Value::Object(_)) => Ok(value),
        Ok(_) => Err(format!("non-object JSON at byte {start}")),
        Err(e) => Err(format!("invalid JSON at byte {start}: {e}")),
    }
}

/// Returns the shortest prefix of `s` that forms a complete `{…}` object,
/// or `None` if the object is unterminated.
///
/// Bracket depth is tracked outside string literals only, honouring escape
/// sequences. Only `}` at depth 0 terminates, so `{"a": 1]` is never
/// accepted.
pub(crate) fn extract_balanced_object(s: &str) -> Option<&str> {
    if !s.starts_with('{') {
        return None;
    }
    let mut depth: i32 = 0;
    let mut in_string = false;
    let mut escape = false;
    for (i, c) in s.char_indices() {
        if escape {
            escape = false;
            continue;
        }
        if in_string {
            match c {
                '\\' => escape = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '[' | '{' => depth += 1,
            ']' => depth -= 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&s[..=i]);
                }
            }
            _ => {}
        }
    }
    None
}
