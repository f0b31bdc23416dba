// POSIX shell quoting

use std::borrow::Cow;

/// Wrap `s` in single quotes, turning each embedded `'` into `'\''`.
///
/// The result evaluates to exactly `s` in any POSIX shell, whatever bytes it contains.
pub fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for ch in s.chars() {
        if ch == '\'' {
            out.push_str("'\\''");
        } else {
            out.push(ch);
        }
    }
    out.push('\'');
    out
}

/// Words a POSIX shell treats as syntax when they appear unquoted
const RESERVED_WORDS: &[&str] = &[
    "case", "do", "done", "elif", "else", "esac", "fi", "for", "if", "in", "then", "until",
    "while",
];

/// True if a shell reads `s` as one literal word with no expansion applied
pub fn is_shell_safe(s: &str) -> bool {
    !s.is_empty()
        && !RESERVED_WORDS.contains(&s)
        && s.bytes().all(|b| {
            matches!(b,
                b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' |
                b'_' | b'-' | b'.' | b'/' | b':' | b'@' | b'%' | b'+' | b','
            )
        })
}

/// Quote `s` only when it would not survive the shell as a single literal word
pub fn quote_word(s: &str) -> Cow<'_, str> {
    if is_shell_safe(s) {
        Cow::Borrowed(s)
    } else {
        Cow::Owned(quote(s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_empty() {
        assert_eq!(quote(""), "''");
    }

    #[test]
    fn test_quote_embedded_quote() {
        assert_eq!(quote("a'b"), r"'a'\''b'");
        assert_eq!(quote("''"), r"''\'''\'''");
    }

    #[test]
    fn test_quote_leaves_specials_inert() {
        assert_eq!(quote("$HOME `id` *"), "'$HOME `id` *'");
        assert_eq!(quote("line\nbreak"), "'line\nbreak'");
    }

    #[test]
    fn test_quote_word_bare_when_safe() {
        assert_eq!(quote_word("cp"), "cp");
        assert_eq!(quote_word("-r"), "-r");
        assert_eq!(quote_word("/tmp/x.log"), "/tmp/x.log");
        assert_eq!(quote_word("user@host:22"), "user@host:22");
    }

    #[test]
    fn test_quote_word_quotes_assignments() {
        assert_eq!(quote_word("X=injected"), "'X=injected'");
        assert_eq!(quote_word("LD_PRELOAD=/tmp/x.so"), "'LD_PRELOAD=/tmp/x.so'");
        assert_eq!(quote_word("--out=/tmp/x.log"), "'--out=/tmp/x.log'");
    }

    #[test]
    fn test_quote_word_quotes_reserved_words() {
        for word in ["if", "then", "fi", "for", "in", "do", "done", "case", "esac", "while"] {
            assert_eq!(quote_word(word), quote(word));
        }
        assert_eq!(quote_word("iffy"), "iffy");
    }

    #[test]
    fn test_quote_word_quotes_when_needed() {
        assert_eq!(quote_word(""), "''");
        assert_eq!(quote_word("My Files"), "'My Files'");
        assert_eq!(quote_word("~/x"), "'~/x'");
        assert_eq!(quote_word("a{b,c}"), "'a{b,c}'");
        assert_eq!(quote_word("it's"), r"'it'\''s'");
    }
}
