use winnow::combinator::{delimited, opt};
use winnow::error::ModalResult;
use winnow::prelude::*;
use winnow::token::take_while;

use crate::FilterError;

// key        := identifier | identifier "[" alias "]"
// identifier := [A-Za-z0-9.]+
// alias      := [A-Za-z]*

fn identifier<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    take_while(1.., |c: char| c.is_ascii_alphanumeric() || c == '.').parse_next(input)
}

fn bracketed_alias<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    delimited('[', take_while(0.., |c: char| c.is_ascii_alphabetic()), ']').parse_next(input)
}

fn rule_key<'i>(input: &mut &'i str) -> ModalResult<(&'i str, Option<&'i str>)> {
    (identifier, opt(bracketed_alias)).parse_next(input)
}

/// Split a rule key into its field name and operator alias. A bare field
/// name yields an empty alias, as does `field[]`.
pub(crate) fn split_key(key: &str) -> Result<(&str, &str), FilterError> {
    rule_key
        .parse(key)
        .map(|(name, alias)| (name, alias.unwrap_or("")))
        .map_err(|_| FilterError::MalformedKey {
            key: key.to_owned(),
        })
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::Operator;

    #[test]
    fn bare_identifier() {
        assert_eq!(split_key("title").unwrap(), ("title", ""));
        assert_eq!(split_key("maintainer.name").unwrap(), ("maintainer.name", ""));
        assert_eq!(split_key("field2").unwrap(), ("field2", ""));
    }

    #[test]
    fn bracketed_operator() {
        assert_eq!(split_key("title[like]").unwrap(), ("title", "like"));
        assert_eq!(split_key("age[GT]").unwrap(), ("age", "GT"));
    }

    #[test]
    fn empty_brackets() {
        assert_eq!(split_key("title[]").unwrap(), ("title", ""));
    }

    #[test]
    fn malformed_keys() {
        for key in [
            "",
            "[like]",
            "title[like",
            "title like]",
            "title[li ke]",
            "title[lt2]",
            "title[like]x",
            "ti-tle",
            "title[like][gt]",
            "na me",
        ] {
            assert!(
                matches!(split_key(key), Err(FilterError::MalformedKey { key: k }) if k == key),
                "expected '{key}' to be malformed"
            );
        }
    }

    proptest! {
        #[test]
        fn bare_keys_are_whole_field_names(key in "[A-Za-z0-9.]{1,16}") {
            let (name, alias) = split_key(&key).unwrap();
            prop_assert_eq!(name, key.as_str());
            prop_assert_eq!(alias, "");
            prop_assert_eq!(Operator::parse(alias).unwrap(), Operator::Equals);
        }
    }
}
