use lazy_static::lazy_static;
use regex::Regex;

use crate::{
    descriptors::DescriptorTable,
    error::GenError,
    traits::ToRegistration,
    types::{EventSpec, PrefSpec},
    utils::join_title_case,
};

lazy_static! {
    static ref NON_WORD: Regex = Regex::new(r"\W+").unwrap();
}

/// Converts a snake_case preference name to PascalCase, e.g. `auto_reconnect` -> `AutoReconnect`.
pub fn to_pascal_case(s: &str) -> String {
    join_title_case(s.split('_'))
}

/// Converts a display name to an identifier by title-casing every word, e.g.
/// `WhoIs Channel/Oper Line` -> `WhoisChannelOperLine`.
pub fn to_identifier(name: &str) -> String {
    join_title_case(NON_WORD.split(name))
}

/// An event joined with the labels of its descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedEvent<'a> {
    pub spec:   &'a EventSpec,
    pub fields: &'a [String],
}

pub fn resolve_event<'a>(
    spec: &'a EventSpec,
    table: &'a DescriptorTable,
) -> Result<ResolvedEvent<'a>, GenError> {
    let fields = table.resolve(&spec.fields_key, &spec.name)?;
    Ok(ResolvedEvent { spec, fields })
}

impl ToRegistration for ResolvedEvent<'_> {
    /// `print_event!(ChangeNick, "Change Nick", "`...`", 0: "Old nickname", 1: "New nickname");`
    fn to_registration(&self) -> String {
        let fields = self
            .fields
            .iter()
            .enumerate()
            .map(|(index, label)| format!(" {}: \"{}\"", index, label))
            .collect::<Vec<_>>()
            .join(",");
        format!(
            "print_event!({}, \"{}\", \"`{}`\",{});",
            to_identifier(&self.spec.name),
            self.spec.name,
            self.spec.format,
            fields
        )
    }
}

impl ToRegistration for PrefSpec {
    fn to_registration(&self) -> String {
        format!(
            "pref!({}, \"{}\", {});",
            to_pascal_case(&self.name),
            self.name,
            self.type_.rust_type()
        )
    }
}

/// Renders one newline-terminated line per record, in order.
pub fn render_lines<T: ToRegistration>(records: &[T]) -> String {
    let mut out = String::new();
    for record in records {
        out.push_str(&record.to_registration());
        out.push('\n');
    }
    out
}

/// Joins every event against `table` and renders the `print_event!` lines.
/// Fails on the first event whose descriptor is missing.
pub fn compile_events_to_rust(
    specs: &[EventSpec],
    table: &DescriptorTable,
) -> Result<String, GenError> {
    let resolved = specs
        .iter()
        .map(|spec| resolve_event(spec, table))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(render_lines(&resolved))
}

pub fn compile_prefs_to_rust(prefs: &[PrefSpec]) -> String {
    render_lines(prefs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PrefType;

    #[test]
    fn identifiers_from_display_names() {
        assert_eq!(to_identifier("Channel Message"), "ChannelMessage");
        assert_eq!(to_identifier("Channel DeHalfOp"), "ChannelDehalfop");
        assert_eq!(to_identifier("WhoIs Channel/Oper Line"), "WhoisChannelOperLine");
        assert_eq!(to_identifier("DCC CHAT Failed"), "DccChatFailed");
    }

    #[test]
    fn pascal_case_from_snake_case() {
        assert_eq!(to_pascal_case("auto_reconnect"), "AutoReconnect");
        assert_eq!(to_pascal_case("gui_win_state"), "GuiWinState");
        assert_eq!(to_pascal_case("irc_nick1"), "IrcNick1");
    }

    #[test]
    fn pref_line() {
        let pref = PrefSpec {
            name:  "auto_reconnect".to_string(),
            line:  3,
            type_: PrefType::Bool,
        };
        assert_eq!(pref.to_registration(), "pref!(AutoReconnect, \"auto_reconnect\", bool);");
    }

    #[test]
    fn event_line_without_fields() {
        let spec = EventSpec {
            name:             "Beep".to_string(),
            line:             1,
            signal:           "XP_TE_BEEP".to_string(),
            fields_key:       "pevt_generic_none_help".to_string(),
            format:           String::new(),
            field_count_hint: "n0".to_string(),
        };
        let event = ResolvedEvent { spec: &spec, fields: &[] };
        assert_eq!(event.to_registration(), "print_event!(Beep, \"Beep\", \"``\",);");
    }
}
