//! Field descriptor extraction.
//!
//! The descriptor source is a C file of string arrays, one per event, each literal
//! optionally wrapped in a translation marker:
//!
//! ```text
//! static char * const pevt_join_help[] = {
//! 	N_("The nick of the joining person"),
//! 	N_("The channel being joined"),
//! };
//! ```
//!
//! Parsing advances a line cursor block by block; there is no C grammar involved.

use std::collections::HashMap;
use std::iter::{Enumerate, Peekable, Skip};
use std::str::Lines;

use lazy_static::lazy_static;
use log::debug;
use regex::Regex;

use crate::{
    error::GenError,
    types::FieldDescriptor,
    utils::{error, quote},
};

lazy_static! {
    static ref DECLARATION:    Regex = Regex::new(r"^\s*[A-Za-z_][\w\s\*]*?\b([A-Za-z_]\w*)\s*\[\s*\]\s*=\s*\{\s*$").unwrap();
    static ref CLOSING:        Regex = Regex::new(r"^\s*\}\s*;?\s*$").unwrap();
    static ref WRAPPED_STRING: Regex = Regex::new(r#"^\s*[A-Za-z_]\w*\(\s*"(.*)"\s*\)\s*,?\s*$"#).unwrap();
    static ref BARE_STRING:    Regex = Regex::new(r#""(.*)""#).unwrap();
}

/// Returns the array name declared on `line`, if it is a declaration.
pub fn parse_declaration(line: &str) -> Option<&str> {
    DECLARATION
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Returns the string payload of a literal line. The wrapped form is tried first.
pub fn parse_literal(line: &str) -> Option<&str> {
    WRAPPED_STRING
        .captures(line)
        .or_else(|| BARE_STRING.captures(line))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

pub fn is_closing(line: &str) -> bool {
    CLOSING.is_match(line)
}

/// Lazily yields one descriptor per array block. Stops after the first error.
pub struct DescriptorExtractor<'a> {
    lines: Peekable<Skip<Enumerate<Lines<'a>>>>,
    done:  bool,
}

impl<'a> DescriptorExtractor<'a> {
    pub fn new(text: &'a str, header_lines: usize) -> Self {
        DescriptorExtractor {
            lines: text.lines().enumerate().skip(header_lines).peekable(),
            done:  false,
        }
    }

    fn skip_blank_lines(&mut self) {
        while self
            .lines
            .next_if(|(_, line)| line.trim().is_empty())
            .is_some()
        {}
    }

    fn next_descriptor(&mut self) -> Option<Result<FieldDescriptor, GenError>> {
        self.skip_blank_lines();
        let (index, line) = self.lines.next()?;
        let line_no = index + 1;

        let key = match parse_declaration(line) {
            Some(key) => key.to_string(),
            None => {
                return Some(Err(error(
                    &format!("Expected an array declaration but found {}", quote(line)),
                    line_no,
                )))
            }
        };

        let mut fields = Vec::new();
        loop {
            let (index, line) = match self.lines.next() {
                Some(next) => next,
                None => {
                    return Some(Err(error(
                        &format!("Array {} is never closed", quote(&key)),
                        line_no,
                    )))
                }
            };
            if is_closing(line) {
                break;
            }
            match parse_literal(line) {
                Some(label) => fields.push(label.to_string()),
                None => {
                    return Some(Err(error(
                        &format!("Expected a quoted string but found {}", quote(line)),
                        index + 1,
                    )))
                }
            }
        }

        debug!("descriptor {} with {} fields", key, fields.len());
        Some(Ok(FieldDescriptor {
            key,
            line: line_no,
            fields,
        }))
    }
}

impl Iterator for DescriptorExtractor<'_> {
    type Item = Result<FieldDescriptor, GenError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let item = self.next_descriptor();
        if !matches!(item, Some(Ok(_))) {
            self.done = true;
        }
        item
    }
}

/// Descriptors keyed by array name, built once per run and consulted by the event emitter.
#[derive(Debug, Default)]
pub struct DescriptorTable {
    descriptors: HashMap<String, FieldDescriptor>,
    empty_key:   String,
}

impl DescriptorTable {
    /// `empty_key` always resolves to an empty field list, whether or not the source declares it.
    pub fn new(empty_key: &str) -> Self {
        DescriptorTable {
            descriptors: HashMap::new(),
            empty_key:   empty_key.to_string(),
        }
    }

    pub fn insert(&mut self, descriptor: FieldDescriptor) -> Result<(), GenError> {
        if let Some(existing) = self.descriptors.get(&descriptor.key) {
            return Err(error(
                &format!(
                    "The array {} is declared twice (first at line {})",
                    quote(&descriptor.key),
                    existing.line
                ),
                descriptor.line,
            ));
        }
        self.descriptors.insert(descriptor.key.clone(), descriptor);
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&FieldDescriptor> {
        self.descriptors.get(key)
    }

    /// Looks up the field labels for `key` on behalf of `event`.
    pub fn resolve(&self, key: &str, event: &str) -> Result<&[String], GenError> {
        match self.descriptors.get(key) {
            Some(descriptor) => Ok(&descriptor.fields),
            None if key == self.empty_key => Ok(&[]),
            None => Err(GenError::UnresolvedReference {
                key:   key.to_string(),
                event: event.to_string(),
            }),
        }
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

/// Runs the extractor to completion and builds the lookup table.
pub fn extract_descriptors(
    text: &str,
    header_lines: usize,
    empty_key: &str,
) -> Result<DescriptorTable, GenError> {
    let mut table = DescriptorTable::new(empty_key);
    for descriptor in DescriptorExtractor::new(text, header_lines) {
        table.insert(descriptor?)?;
    }
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declaration_names_the_array() {
        assert_eq!(
            parse_declaration("static char * const pevt_join_help[] = {"),
            Some("pevt_join_help")
        );
        assert_eq!(parse_declaration("const char *labels[] = {"), Some("labels"));
        assert_eq!(parse_declaration("labels[] = {"), None);
        assert_eq!(parse_declaration("\tN_(\"Nickname\"),"), None);
    }

    #[test]
    fn wrapped_literal_is_preferred() {
        assert_eq!(parse_literal("\tN_(\"Nickname\"),"), Some("Nickname"));
        assert_eq!(parse_literal("\t_(\"The text\")"), Some("The text"));
    }

    #[test]
    fn bare_literal_is_the_fallback() {
        assert_eq!(parse_literal("\t\"Plain label\","), Some("Plain label"));
        assert_eq!(parse_literal("\tN_(Nickname),"), None);
    }

    #[test]
    fn escapes_are_kept_verbatim() {
        assert_eq!(
            parse_literal(r#"	N_("Channel Membership/\"is an IRC operator\""),"#),
            Some(r#"Channel Membership/\"is an IRC operator\""#)
        );
    }

    #[test]
    fn closing_line_variants() {
        assert!(is_closing("};"));
        assert!(is_closing("  }  "));
        assert!(!is_closing("{"));
    }

    #[test]
    fn resolve_falls_back_to_the_empty_key() {
        let table = DescriptorTable::new("pevt_generic_none_help");
        assert!(table.resolve("pevt_generic_none_help", "Beep").unwrap().is_empty());
        assert!(matches!(
            table.resolve("pevt_missing_help", "Beep"),
            Err(GenError::UnresolvedReference { .. })
        ));
    }
}
