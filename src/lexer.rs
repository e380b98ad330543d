//! Lexical normalization helpers (spec §4, component F): indent counting,
//! comment stripping, trimming, brace detection, and the textual
//! substitutions for the `time.now()` family. All of these are guarded
//! against acting inside string literals by splitting the line into
//! alternating code/string [`Segment`]s first.

use std::borrow::Cow;

/// A line split into alternating code and string-literal spans. Only `Code`
/// spans are candidates for comment stripping or textual rewriting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment<'a> {
    Code(&'a str),
    /// Includes the surrounding quotes.
    Str(&'a str),
}

/// Splits `line` on unescaped double quotes. A trailing unterminated string
/// (missing closing quote) is treated as running to end of line, so that
/// downstream passes never rewrite inside it either.
pub fn split_segments(line: &str) -> Vec<Segment<'_>> {
    let mut segments = vec![];
    let bytes = line.as_bytes();
    let mut i = 0;
    let mut code_start = 0;

    while i < bytes.len() {
        if bytes[i] == b'"' {
            if code_start < i {
                segments.push(Segment::Code(&line[code_start..i]));
            }
            let str_start = i;
            i += 1;
            while i < bytes.len() {
                if bytes[i] == b'\\' && i + 1 < bytes.len() {
                    i += 2;
                    continue;
                }
                if bytes[i] == b'"' {
                    i += 1;
                    break;
                }
                i += 1;
            }
            segments.push(Segment::Str(&line[str_start..i]));
            code_start = i;
        } else {
            i += 1;
        }
    }

    if code_start < bytes.len() {
        segments.push(Segment::Code(&line[code_start..]));
    }

    segments
}

/// Rebuilds a line from segments after rewriting only the `Code` spans.
fn rewrite_code_spans(line: &str, mut rewrite: impl FnMut(&str) -> String) -> String {
    split_segments(line)
        .into_iter()
        .map(|seg| match seg {
            Segment::Code(code) => rewrite(code),
            Segment::Str(s) => s.to_owned(),
        })
        .collect()
}

/// Strips a trailing `\r` (for CRLF input) and surrounding whitespace.
pub fn normalize_line(raw: &str) -> &str {
    raw.strip_suffix('\r').unwrap_or(raw).trim()
}

/// Strips a `#` end-of-line comment, but only when the `#` occurs outside a
/// string literal.
pub fn strip_comment(line: &str) -> Cow<'_, str> {
    for seg in split_segments(line) {
        if let Segment::Code(code) = seg {
            if let Some(idx) = code.find('#') {
                let offset = code.as_ptr() as usize - line.as_ptr() as usize;
                return Cow::Owned(line[..offset + idx].to_string());
            }
        }
    }
    Cow::Borrowed(line)
}

/// Indentation width: spaces count 1, tabs count 4 (spec §6).
pub fn indent_of(line: &str) -> usize {
    let mut indent = 0;
    for ch in line.chars() {
        match ch {
            ' ' => indent += 1,
            '\t' => indent += 4,
            _ => break,
        }
    }
    indent
}

/// The first whitespace/punctuation-delimited token of a trimmed line, used
/// by the statement dispatcher for longest-prefix classification.
pub fn first_token(trimmed: &str) -> &str {
    let end = trimmed
        .char_indices()
        .find(|(_, c)| c.is_whitespace() || matches!(c, '(' | '{' | ':'))
        .map(|(i, _)| i)
        .unwrap_or(trimmed.len());
    &trimmed[..end]
}

/// True when the trimmed line's first non-whitespace token is a lone `}`.
pub fn is_close_brace(trimmed: &str) -> bool {
    trimmed == "}"
}

/// Rewrites `time.now()`/`date.now()` to `(int)time(NULL)` and
/// `clock.now()` to `((double)clock() / CLOCKS_PER_SEC)`, skipping string
/// literal spans.
pub fn rewrite_time_calls(line: &str) -> String {
    rewrite_code_spans(line, |code| {
        code.replace("time.now()", "(int)time(NULL)")
            .replace("date.now()", "(int)time(NULL)")
            .replace("clock.now()", "((double)clock() / CLOCKS_PER_SEC)")
    })
}

/// Rewrites `V[` to `V.data[` for every occurrence of a list-typed
/// identifier `V`, skipping string literal spans. `is_list` answers whether
/// a given identifier name is currently registered as a list.
pub fn rewrite_list_indexing(expr: &str, mut is_list: impl FnMut(&str) -> bool) -> String {
    rewrite_code_spans(expr, |code| {
        let mut out = String::with_capacity(code.len());
        let chars: Vec<char> = code.chars().collect();
        let mut i = 0;
        while i < chars.len() {
            let c = chars[i];
            if c.is_ascii_alphabetic() || c == '_' {
                let start = i;
                while i < chars.len() && (chars[i].is_ascii_alphanumeric() || chars[i] == '_') {
                    i += 1;
                }
                let ident: String = chars[start..i].iter().collect();
                if i < chars.len() && chars[i] == '[' && is_list(&ident) {
                    out.push_str(&ident);
                    out.push_str(".data");
                } else {
                    out.push_str(&ident);
                }
            } else {
                out.push(c);
                i += 1;
            }
        }
        out
    })
}
