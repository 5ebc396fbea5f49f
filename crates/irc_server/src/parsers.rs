//! Identifier grammar (RFC 2812 §2.3.1, adapted to this server's narrower
//! nickname/channel rules) implemented with `nom` parser combinators, in the
//! same style as the rest of the command parsers: one function per grammar
//! production, `#[cfg(test)]` cases directly below.

use nom::{IResult, Parser, bytes::complete::take_while1, combinator::verify};

/// Nickname grammar: length 1-50, first character alphabetic, no
/// space/comma/colon, every character printable. Mirrors the reference
/// implementation's `isValidName` rather than RFC 2812's own (stricter,
/// 9-char) grammar.
fn nickname_grammar(s: &str) -> bool {
    if s.is_empty() || s.len() > 50 {
        return false;
    }
    let first = s.as_bytes()[0];
    if !first.is_ascii_alphabetic() {
        return false;
    }
    if s.contains([' ', ',', ':']) {
        return false;
    }
    s.chars().all(|c| c.is_ascii_graphic())
}

/// Parses a nickname token: a run of non-whitespace satisfying
/// [`nickname_grammar`]. Used by [`is_valid_nickname`] and directly by
/// callers that want the parsed slice.
pub fn nickname_parser(input: &str) -> IResult<&str, &str> {
    verify(take_while1(|c: char| !c.is_whitespace()), |s: &str| {
        nickname_grammar(s)
    })
    .parse(input)
}

/// True if `s` is a valid nickname in its entirety (the `NICK` validation
/// path: no partial match is acceptable, the whole token must be consumed).
pub fn is_valid_nickname(s: &str) -> bool {
    matches!(nickname_parser(s), Ok((rest, _)) if rest.is_empty())
}

/// Channel name grammar: `#`-prefixed, length 1-50 including the `#`, no
/// space/comma/colon/bell.
fn channel_grammar(s: &str) -> bool {
    if !s.starts_with('#') || s.len() > 50 || s.len() < 2 {
        return false;
    }
    !s.contains([' ', ',', ':', '\x07'])
}

/// Parses a channel name token: a run of non-whitespace satisfying
/// [`channel_grammar`]. Used by [`is_valid_channel_name`] and directly by
/// callers that want the parsed slice.
pub fn channel_parser(input: &str) -> IResult<&str, &str> {
    verify(take_while1(|c: char| !c.is_whitespace()), |s: &str| {
        channel_grammar(s)
    })
    .parse(input)
}

/// True if `s` is a valid channel name in its entirety (the `JOIN`
/// validation path: no partial match is acceptable, the whole token must be
/// consumed).
pub fn is_valid_channel_name(s: &str) -> bool {
    matches!(channel_parser(s), Ok((rest, _)) if rest.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_nicknames() {
        assert!(is_valid_nickname("alice"));
        assert!(is_valid_nickname("Wiz"));
        assert!(is_valid_nickname(&"a".repeat(50)));
        assert!(!is_valid_nickname(&"a".repeat(51)));
        assert!(!is_valid_nickname(""));
        assert!(!is_valid_nickname("1abc"));
        assert!(!is_valid_nickname("al ice"));
        assert!(!is_valid_nickname("al,ice"));
        assert!(!is_valid_nickname("al:ice"));
    }

    #[test]
    fn test_valid_channel_names() {
        assert!(is_valid_channel_name("#lobby"));
        assert!(!is_valid_channel_name("lobby"));
        assert!(!is_valid_channel_name("#"));
        assert!(!is_valid_channel_name("#a b"));
        assert!(!is_valid_channel_name(&format!("#{}", "a".repeat(50))));
    }

    #[test]
    fn test_nickname_parser() {
        let (rem, nick) = nickname_parser("alice rest").unwrap();
        assert_eq!(nick, "alice");
        assert_eq!(rem, " rest");
        assert!(nickname_parser("1abc").is_err());
    }
}
