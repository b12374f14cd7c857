use crate::error::GenError;

/// Quotes `text` as a JSON string for use in diagnostics.
pub fn quote(text: &str) -> String {
    serde_json::to_string(text).unwrap_or_else(|_| format!("\"{}\"", text))
}

pub fn error(msg: &str, line: usize) -> GenError {
    GenError::ParseError {
        msg: msg.to_string(),
        line,
    }
}

/// Upper-cases the first character of `word` and lower-cases the rest.
pub fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().to_string() + &chars.as_str().to_lowercase(),
    }
}

/// Title-cases every non-empty word and joins them with no separator.
pub fn join_title_case<'a, I>(words: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    words
        .into_iter()
        .filter(|word| !word.is_empty())
        .map(title_case)
        .collect::<String>()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_case_lowers_the_tail() {
        assert_eq!(title_case("DeHalfOp"), "Dehalfop");
        assert_eq!(title_case("dcc"), "Dcc");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn join_skips_empty_words() {
        assert_eq!(join_title_case(["", "auto", "", "reconnect"]), "AutoReconnect");
    }

    #[test]
    fn quote_escapes_inner_quotes() {
        assert_eq!(quote(r#"say "hi""#), r#""say \"hi\"""#);
    }
}
