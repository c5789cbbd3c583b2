use std::fmt;

/// Shows just enough of a code or token to correlate log lines.
pub struct Redacted<'a>(pub &'a str);

impl fmt::Display for Redacted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix: String = self.0.chars().take(4).collect();
        write!(f, "{}.. ({} chars)", prefix, self.0.chars().count())
    }
}
