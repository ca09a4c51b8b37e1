//! Output parsers, one per output dialect.
//!
//! Every parser is a pure function from raw tool output to one
//! [`FileResult`] per reported file, in order of first appearance. Parsers
//! never fail: malformed JSON yields nothing and malformed lines are
//! skipped.
//!
//! Line-oriented dialects are parsed by scanning for delimiters left to
//! right. No regular expressions, so parse time stays linear in the input.

pub mod bracketed;
pub mod eslint;
pub mod findings;
pub mod positional;
pub mod slash_rule;

use lintmux_core::{aggregate, FileResult, Issue};

/// Groups `(path, issue)` pairs into one result per path, first-seen order.
pub(crate) fn by_file<I>(language: &str, entries: I) -> Vec<FileResult>
where
    I: IntoIterator<Item = (String, Issue)>,
{
    aggregate(
        entries
            .into_iter()
            .map(|(path, issue)| FileResult::new(path, language, vec![issue])),
    )
}

/// Splits `path:rest` at the colon ending the path.
///
/// A Windows drive prefix such as `C:\` is kept as part of the path.
pub(crate) fn split_path(line: &str) -> Option<(&str, &str)> {
    let bytes = line.as_bytes();
    let skip = if bytes.len() > 2
        && bytes[0].is_ascii_alphabetic()
        && bytes[1] == b':'
        && (bytes[2] == b'\\' || bytes[2] == b'/')
    {
        2
    } else {
        0
    };

    let colon = skip + line[skip..].find(':')?;
    let path = &line[..colon];
    if path.trim().is_empty() {
        return None;
    }
    Some((path, &line[colon + 1..]))
}

/// Takes a positive number terminated by `delim`.
pub(crate) fn take_number(rest: &str, delim: char) -> Option<(usize, &str)> {
    let (digits, rest) = rest.split_once(delim)?;
    let n = digits.trim().parse::<usize>().ok().filter(|n| *n > 0)?;
    Some((n, rest))
}
