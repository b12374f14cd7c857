//! Reader for the text event table.
//!
//! Every event occupies a fixed run of lines with no separators:
//!
//! ```text
//! Add Notify
//! XP_TE_ADDNOTIFY
//! pevt_generic_nick_help
//! %C18*%O$t%C18$1%O added to notify list.
//! 3
//! ```

use std::iter::Enumerate;
use std::str::Lines;

use log::debug;

use crate::{
    error::GenError,
    types::EventSpec,
    utils::error,
};

/// Lazily yields one event per group of `stride` lines. A trailing partial group is an error.
pub struct EventSpecReader<'a> {
    lines:  Enumerate<Lines<'a>>,
    stride: usize,
    done:   bool,
}

impl<'a> EventSpecReader<'a> {
    /// Only the first five lines of each group are interpreted; a `stride` above five
    /// skips the extra lines.
    pub fn new(text: &'a str, stride: usize) -> Self {
        EventSpecReader {
            lines: text.lines().enumerate(),
            stride,
            done: false,
        }
    }

    fn next_group(&mut self) -> Option<Result<Vec<(usize, &'a str)>, GenError>> {
        let group: Vec<(usize, &str)> = self.lines.by_ref().take(self.stride).collect();
        if group.is_empty() {
            return None;
        }
        if group.len() < self.stride {
            return Some(Err(error(
                &format!(
                    "Incomplete event record: expected {} lines but found {}",
                    self.stride,
                    group.len()
                ),
                group[0].0 + 1,
            )));
        }
        Some(Ok(group))
    }
}

impl Iterator for EventSpecReader<'_> {
    type Item = Result<EventSpec, GenError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        if self.stride < 5 {
            self.done = true;
            return Some(Err(error(
                &format!("An event record needs 5 lines, stride is {}", self.stride),
                0,
            )));
        }

        let group = match self.next_group()? {
            Ok(group) => group,
            Err(e) => {
                self.done = true;
                return Some(Err(e));
            }
        };

        let (index, name) = group[0];
        let spec = EventSpec {
            name:             name.to_string(),
            line:             index + 1,
            signal:           group[1].1.to_string(),
            fields_key:       group[2].1.to_string(),
            format:           group[3].1.to_string(),
            field_count_hint: group[4].1.to_string(),
        };
        debug!("event {} at line {}", spec.name, spec.line);
        Some(Ok(spec))
    }
}

pub fn read_event_specs(text: &str, stride: usize) -> Result<Vec<EventSpec>, GenError> {
    EventSpecReader::new(text, stride).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_groups_in_order() {
        let text = "Beep\nXP_TE_BEEP\npevt_generic_none_help\n\nn0\n\
                    Part\nXP_TE_PART\npevt_part_help\n$1 has left $3\n3\n";
        let specs = read_event_specs(text, 5).unwrap();
        assert_eq!(specs.len(), 2);
        assert_eq!(specs[0].name, "Beep");
        assert_eq!(specs[0].format, "");
        assert_eq!(specs[0].field_count_hint, "n0");
        assert_eq!(specs[1].line, 6);
        assert_eq!(specs[1].fields_key, "pevt_part_help");
    }

    #[test]
    fn partial_group_is_fatal() {
        let text = "Beep\nXP_TE_BEEP\npevt_generic_none_help\n\nn0\nPart\nXP_TE_PART\n";
        match read_event_specs(text, 5) {
            Err(GenError::ParseError { line, .. }) => assert_eq!(line, 6),
            other => panic!("expected a parse error, got {:?}", other),
        }
    }

    #[test]
    fn empty_input_has_no_events() {
        assert!(read_event_specs("", 5).unwrap().is_empty());
    }
}
