//! Preference table extraction.
//!
//! Rows of the preference table look like
//!
//! ```text
//! 	{"away_auto_unmark", P_OFFINT (hex_away_auto_unmark), TYPE_BOOL},
//! ```
//!
//! and share the file with structural and comment lines, which are skipped.

use std::iter::{Enumerate, Skip};
use std::str::Lines;

use lazy_static::lazy_static;
use log::{debug, trace};
use regex::Regex;

use crate::{
    error::GenError,
    types::{PrefSpec, PrefType},
};

lazy_static! {
    static ref PREF_ROW: Regex = Regex::new(r#"^\s+\{\s*"([^"]*)"\s*,[^,]*,\s*(\w+)"#).unwrap();
    static ref SENTINEL: Regex = Regex::new(r"^\{\s*0\s*,\s*0\s*,\s*0\s*\}\s*,?$").unwrap();
}

/// Captures `(name, type token)` from a table row.
pub fn parse_pref_row(line: &str) -> Option<(&str, &str)> {
    let caps = PREF_ROW.captures(line)?;
    Some((caps.get(1)?.as_str(), caps.get(2)?.as_str()))
}

/// True for the `{0, 0, 0},` row terminating the table.
pub fn is_sentinel(line: &str) -> bool {
    SENTINEL.is_match(line.trim())
}

/// Lazily yields one preference per matching row. Unknown type tokens are fatal.
pub struct PrefExtractor<'a> {
    lines: Skip<Enumerate<Lines<'a>>>,
    done:  bool,
}

impl<'a> PrefExtractor<'a> {
    pub fn new(text: &'a str, header_lines: usize) -> Self {
        PrefExtractor {
            lines: text.lines().enumerate().skip(header_lines),
            done:  false,
        }
    }
}

impl Iterator for PrefExtractor<'_> {
    type Item = Result<PrefSpec, GenError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        for (index, line) in self.lines.by_ref() {
            if line.is_empty() || !line.starts_with(char::is_whitespace) {
                continue;
            }
            if is_sentinel(line) {
                trace!("line {}: end of table", index + 1);
                continue;
            }
            let (name, symbol) = match parse_pref_row(line) {
                Some(row) => row,
                None => {
                    trace!("line {}: not a preference row", index + 1);
                    continue;
                }
            };

            let type_ = match PrefType::from_symbol(symbol) {
                Some(type_) => type_,
                None => {
                    self.done = true;
                    return Some(Err(GenError::UnsupportedType {
                        type_: symbol.to_string(),
                        name:  name.to_string(),
                        line:  index + 1,
                    }));
                }
            };

            debug!("preference {} ({:?})", name, type_);
            return Some(Ok(PrefSpec {
                name: name.to_string(),
                line: index + 1,
                type_,
            }));
        }
        None
    }
}

pub fn extract_prefs(text: &str, header_lines: usize) -> Result<Vec<PrefSpec>, GenError> {
    PrefExtractor::new(text, header_lines).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_captures_name_and_type() {
        assert_eq!(
            parse_pref_row("  {\"auto_reconnect\", 0, TYPE_BOOL, 0}"),
            Some(("auto_reconnect", "TYPE_BOOL"))
        );
        assert_eq!(
            parse_pref_row("\t{\"irc_nick1\", P_OFFSET (hex_irc_nick1), TYPE_STR},"),
            Some(("irc_nick1", "TYPE_STR"))
        );
    }

    #[test]
    fn unindented_and_structural_rows_do_not_match() {
        assert_eq!(parse_pref_row("{\"auto_reconnect\", 0, TYPE_BOOL, 0}"), None);
        assert_eq!(parse_pref_row("\t/* comment */"), None);
    }

    #[test]
    fn sentinel_forms() {
        assert!(is_sentinel("  {0, 0, 0},"));
        assert!(is_sentinel("\t{0,0,0}"));
        assert!(!is_sentinel("  {0, 0, 1},"));
    }
}
