//! Wire-line tokenizer.
//!
//! https://www.rfc-editor.org/rfc/rfc2812
//! 2.3.1 Message format in Augmented BNF
//!
//!    The protocol messages must be extracted from the contiguous stream of
//!    octets.  The current solution is to designate two characters, CR and
//!    LF, as message separators.  Empty messages are silently ignored,
//!    which permits use of the sequence CR-LF between messages without
//!    extra problems.
//!
//!     message    =  [ ":" prefix SPACE ] command [ params ] crlf
//!     prefix     =  servername / ( nickname [ [ "!" user ] "@" host ] )
//!     command    =  1*letter / 3digit
//!     params     =  *14( SPACE middle ) [ SPACE ":" trailing ]
//!                =/ 14( SPACE middle ) [ SPACE [ ":" ] trailing ]
//!
//! Client-originated lines never carry a `:prefix`, so this tokenizer only
//! handles `command [params]`: split on single spaces up to the first
//! ` :`, after which everything (spaces included) is one trailing
//! parameter. The command token is upper-cased for dispatch.

/// One parsed client line: an upper-cased command and its parameter list,
/// with the (possibly space-containing) trailing parameter as the last
/// element if one was present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub command: String,
    pub params: Vec<String>,
}

impl Message {
    /// Parses one line (without its `\r\n` terminator). Returns `None` for
    /// an empty or whitespace-only line, which callers must silently
    /// ignore per the registration-gate rule.
    pub fn parse(line: &str) -> Option<Message> {
        let line = line.trim_end_matches(['\r', '\n']);
        if line.trim().is_empty() {
            return None;
        }

        let (head, trailing) = match line.find(" :") {
            Some(idx) => (&line[..idx], Some(&line[idx + 2..])),
            None => (line, None),
        };

        let mut tokens: Vec<&str> = head.split(' ').filter(|t| !t.is_empty()).collect();
        if tokens.is_empty() {
            // The whole line was just the trailing parameter, e.g. ":hi" with
            // no command — treat as empty, there is nothing to dispatch on.
            return None;
        }
        let command = tokens.remove(0).to_ascii_uppercase();
        let mut params: Vec<String> = tokens.into_iter().map(str::to_owned).collect();
        if let Some(trailing) = trailing {
            params.push(trailing.to_owned());
        }

        Some(Message { command, params })
    }

    pub fn arg(&self, index: usize) -> Option<&str> {
        self.params.get(index).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_command_with_no_params() {
        let m = Message::parse("QUIT").unwrap();
        assert_eq!(m.command, "QUIT");
        assert!(m.params.is_empty());
    }

    #[test]
    fn parses_middle_params_and_trailing() {
        let m = Message::parse("USER guest 0 * :Ronnie Reagan").unwrap();
        assert_eq!(m.command, "USER");
        assert_eq!(
            m.params,
            vec!["guest", "0", "*", "Ronnie Reagan"]
                .into_iter()
                .map(String::from)
                .collect::<Vec<_>>()
        );
    }

    #[test]
    fn uppercases_command_only() {
        let m = Message::parse("nick Alice").unwrap();
        assert_eq!(m.command, "NICK");
        assert_eq!(m.params, vec!["Alice".to_string()]);
    }

    #[test]
    fn empty_line_is_ignored() {
        assert!(Message::parse("").is_none());
        assert!(Message::parse("   ").is_none());
        assert!(Message::parse("\r\n").is_none());
    }

    #[test]
    fn trailing_param_may_contain_colons_and_spaces() {
        let m = Message::parse("PRIVMSG #chan :hello : world").unwrap();
        assert_eq!(m.command, "PRIVMSG");
        assert_eq!(m.arg(0), Some("#chan"));
        assert_eq!(m.arg(1), Some("hello : world"));
    }
}
