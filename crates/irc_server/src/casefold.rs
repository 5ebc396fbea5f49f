//! IRC "Scandinavian" case folding: `{}|^` are the lowercase equivalents of
//! `[]\~`, and ASCII case folds as usual. Used for nickname and channel name
//! equality everywhere in the server: channel names are folded into the
//! `Server`'s channel table key on insertion and lookup, and nicknames are
//! compared by folding both sides (the connection table is keyed by socket,
//! not by nick, so there is no nick-keyed map to fold a key into).

/// Upper-cases one character under IRC case-folding rules.
fn fold_char(c: char) -> char {
    match c {
        '{' => '[',
        '}' => ']',
        '|' => '\\',
        '^' => '~',
        c => c.to_ascii_uppercase(),
    }
}

/// Folds a whole string under IRC case-folding rules.
pub fn fold(s: &str) -> String {
    s.chars().map(fold_char).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scandinavian_pairs_fold_equal() {
        assert_eq!(fold("{mma}"), fold("[MMA]"));
        assert_eq!(fold("a|b"), fold("A\\B"));
        assert_eq!(fold("x^y"), fold("X~Y"));
    }

    #[test]
    fn plain_ascii_folds_like_uppercase() {
        assert_eq!(fold("Alice"), "ALICE");
    }

    #[test]
    fn fold_equality_ignores_case() {
        assert_eq!(fold("Alice"), fold("ALICE"));
        assert_ne!(fold("Alice"), fold("Bob"));
    }
}
