//! Counter key derivation.
//!
//! A key addresses one counter slot in the remote store and must be usable
//! as a single path segment, so `/` and `.` are folded to `_` after
//! percent-decoding. The fold is lossy: `a/b`, `a.b` and `a_b` share a slot.
//! Keeping the rule as-is preserves continuity with counters already stored
//! under it.

use std::fmt;

/// Sanitized identifier addressing one counter slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CounterKey(String);

impl CounterKey {
    /// Derive a key from a raw URL or URL-derived path.
    ///
    /// Percent-escapes are decoded first so `a%2Fb` and `a/b` land on the
    /// same slot, then every `/` and `.` becomes `_`. Everything else is
    /// kept verbatim. Deterministic for a given input.
    pub fn derive(raw: &str) -> Self {
        let folded = percent_decode(raw)
            .chars()
            .map(|c| if c == '/' || c == '.' { '_' } else { c })
            .collect();
        CounterKey(folded)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CounterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Decode `%XX` escapes byte-wise.
///
/// Malformed escapes pass through verbatim, and so does any run of escapes
/// whose decoded bytes are not valid UTF-8. Input URLs come from the page
/// environment and may contain anything; decoding must never fail.
pub fn percent_decode(raw: &str) -> String {
    let bytes = raw.as_bytes();
    let mut out = String::with_capacity(raw.len());
    // Decoded bytes of the current escape run, plus their original text so
    // invalid UTF-8 can be restored untouched.
    let mut run: Vec<u8> = Vec::new();
    let mut run_raw = String::new();

    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            if let (Some(hi), Some(lo)) = (hex_val(bytes[i + 1]), hex_val(bytes[i + 2])) {
                run.push(hi << 4 | lo);
                run_raw.push_str(&raw[i..i + 3]);
                i += 3;
                continue;
            }
        }
        flush_run(&mut out, &mut run, &mut run_raw);
        // `i` always sits on a char boundary: we only ever advance past
        // whole chars or whole ASCII escape triplets.
        if let Some(c) = raw[i..].chars().next() {
            out.push(c);
            i += c.len_utf8();
        } else {
            break;
        }
    }
    flush_run(&mut out, &mut run, &mut run_raw);
    out
}

fn flush_run(out: &mut String, run: &mut Vec<u8>, run_raw: &mut String) {
    if run.is_empty() {
        return;
    }
    match std::str::from_utf8(run) {
        Ok(s) => out.push_str(s),
        Err(_) => out.push_str(run_raw),
    }
    run.clear();
    run_raw.clear();
}

fn hex_val(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}
