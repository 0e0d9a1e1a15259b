//! Parser for the "Turn into Gems..." owner-action link.
//!
//! Steam renders the action as
//! `javascript:GetGooValue( '%contextid%', '%assetid%', 570, 2, 0 )`.
//! The arguments are split on commas; the expected value is read from a
//! fixed position.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::MalformedLinkFormat;

/// Zero-based argument position read as the expected value.
pub const VALUE_FIELD: usize = 3;

static GOO_CALL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)GetGooValue\s*\(([^)]*)\)").expect("static regex is valid")
});

/// True when the link refers to the gem conversion at all.
pub fn mentions_goo(link: &str) -> bool {
    link.to_lowercase().contains("goo")
}

/// Arguments of a `GetGooValue( ... )` call, unquoted and trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GooLink {
    args: Vec<String>,
}

impl GooLink {
    pub fn parse(link: &str) -> Result<Self, MalformedLinkFormat> {
        let captures = GOO_CALL
            .captures(link)
            .ok_or_else(|| MalformedLinkFormat::new(link, "no GetGooValue( ... ) call"))?;
        let args: Vec<String> = captures[1]
            .split(',')
            .map(|arg| arg.trim().trim_matches(|c| c == '\'' || c == '"').to_string())
            .collect();
        Ok(Self { args })
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn numeric_field(&self, link: &str, index: usize) -> Result<u64, MalformedLinkFormat> {
        let raw = self.args.get(index).ok_or_else(|| {
            MalformedLinkFormat::new(
                link,
                format!("expected at least {} arguments, found {}", index + 1, self.args.len()),
            )
        })?;
        raw.parse::<u64>().map_err(|e| {
            MalformedLinkFormat::new(
                link,
                format!("argument {index} ({raw:?}) is not a number: {e}"),
            )
        })
    }
}

/// Reads the expected value straight out of the link.
pub fn expected_value_from_link(link: &str) -> Result<u64, MalformedLinkFormat> {
    GooLink::parse(link)?.numeric_field(link, VALUE_FIELD)
}

#[cfg(test)]
mod tests {
    use super::*;

    const LINK: &str = "javascript:GetGooValue( '%contextid%', '%assetid%', 570, 2, 0 )";

    #[test]
    fn parses_owner_action_link() {
        let parsed = GooLink::parse(LINK).unwrap();
        assert_eq!(parsed.args(), ["%contextid%", "%assetid%", "570", "2", "0"]);
        assert_eq!(expected_value_from_link(LINK).unwrap(), 2);
    }

    #[test]
    fn mentions_goo_is_case_insensitive() {
        assert!(mentions_goo(LINK));
        assert!(mentions_goo("javascript:GETGOOVALUE()"));
        assert!(!mentions_goo("https://steamcommunity.com/my/gamecards/570/"));
    }

    #[test]
    fn link_without_call_is_malformed() {
        let err =
            expected_value_from_link("https://steamcommunity.com/my/gamecards/570/").unwrap_err();
        assert!(err.reason.contains("GetGooValue"));
        assert_eq!(err.link, "https://steamcommunity.com/my/gamecards/570/");
    }

    #[test]
    fn too_few_arguments_is_malformed() {
        let err =
            expected_value_from_link("javascript:GetGooValue( '%contextid%', 570 )").unwrap_err();
        assert!(err.reason.contains("at least 4"));
    }

    #[test]
    fn non_numeric_field_is_malformed() {
        let err = expected_value_from_link("javascript:GetGooValue( 'a', 'b', 570, 'x', 0 )")
            .unwrap_err();
        assert!(err.reason.contains("not a number"));
    }
}
