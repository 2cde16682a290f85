// Whitespace tokenization of one input line.
//
// No quoting, escaping or expansion happens here: a literal `$HOME` stays
// `$HOME`. Anything fancier than splitting belongs to a different shell.

/// Characters that separate arguments.
const DELIMITERS: &[char] = &[' ', '\t', '\r', '\n'];

/// The argument vector produced from one input line.
///
/// The first token is the command name, the rest are its arguments. Indexed
/// access goes through [`Argv::get`], whose `None` plays the role of the
/// terminating null in a C `argv` array: callers walk indices until it
/// answers `None` instead of tracking a separate length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Argv {
    tokens: Vec<String>,
}

impl Argv {
    /// Token at `index`, or `None` past the last one.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.tokens.get(index).map(|s| s.as_str())
    }

    /// The command name (first token), if the line had any tokens.
    pub fn name(&self) -> Option<&str> {
        self.get(0)
    }

    /// Everything after the command name.
    pub fn args(&self) -> &[String] {
        self.tokens.get(1..).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// Split a raw line into tokens on runs of whitespace.
///
/// Delimiters are never part of a token; a line of only delimiters yields an
/// empty vector. Storage grows as needed, so argument count is unbounded.
pub fn tokenize(line: &str) -> Argv {
    let tokens = line
        .split(DELIMITERS)
        .filter(|t| !t.is_empty())
        .map(|t| t.to_string())
        .collect();

    Argv { tokens }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_whitespace_runs() {
        let argv = tokenize("  ls  -la \t /tmp\n");
        assert_eq!(argv.name(), Some("ls"));
        assert_eq!(argv.get(1), Some("-la"));
        assert_eq!(argv.get(2), Some("/tmp"));
        assert_eq!(argv.get(3), None);
        assert_eq!(argv.len(), 3);
    }

    #[test]
    fn blank_line_yields_empty_argv() {
        let argv = tokenize(" \t \r\n");
        assert!(argv.is_empty());
        assert_eq!(argv.name(), None);
        assert_eq!(argv.get(0), None);
    }

    #[test]
    fn no_expansion_of_dollar_tokens() {
        let argv = tokenize("echo $HOME");
        assert_eq!(argv.args(), &["$HOME".to_string()]);
    }

    #[test]
    fn carriage_returns_are_delimiters() {
        let argv = tokenize("pwd\r\n");
        assert_eq!(argv.name(), Some("pwd"));
        assert_eq!(argv.len(), 1);
    }

    #[test]
    fn many_tokens() {
        let line = (0..200).map(|i| i.to_string()).collect::<Vec<_>>().join(" ");
        let argv = tokenize(&line);
        assert_eq!(argv.len(), 200);
        assert_eq!(argv.get(199), Some("199"));
        assert_eq!(argv.get(200), None);
    }
}
