use std::fmt;

use crate::error::{LocateError, Result};

/// A run identifier of the form `<date>_<agent-tag>@<org>__<repo>-<issue>`.
///
/// The part after the last `@` is the slug used to find the trajectory file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunId {
    raw: String,
    at: usize,
}

impl RunId {
    pub fn parse(s: &str) -> Result<Self> {
        let raw = s.trim();
        let at = raw
            .rfind('@')
            .ok_or_else(|| LocateError::InvalidIdentifier(raw.to_string()))?;
        if raw[at + 1..].is_empty() {
            return Err(LocateError::InvalidIdentifier(raw.to_string()));
        }
        Ok(Self {
            raw: raw.to_string(),
            at,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn slug(&self) -> &str {
        &self.raw[self.at + 1..]
    }

    /// Everything before the slug, e.g. `20240620_sweagent_claude3.5sonnet`.
    pub fn agent_tag(&self) -> &str {
        &self.raw[..self.at]
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Parse the contents of an ids file: one identifier per line, blank lines and
/// `#` comments skipped. Lines are returned raw so that invalid ones can be
/// reported per identifier by the batch.
pub fn parse_id_list(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_after_last_at() {
        let id = RunId::parse("20240620_sweagent_claude3.5sonnet@astropy__astropy-12907").unwrap();
        assert_eq!(id.slug(), "astropy__astropy-12907");
        assert_eq!(id.agent_tag(), "20240620_sweagent_claude3.5sonnet");

        let id = RunId::parse("a@b@django__django-11099").unwrap();
        assert_eq!(id.slug(), "django__django-11099");
        assert_eq!(id.agent_tag(), "a@b");
    }

    #[test]
    fn test_trims_whitespace() {
        let id = RunId::parse("  x@org__repo-1\n").unwrap();
        assert_eq!(id.as_str(), "x@org__repo-1");
        assert_eq!(id.to_string(), "x@org__repo-1");
    }

    #[test]
    fn test_rejects_missing_at_or_slug() {
        assert!(matches!(
            RunId::parse("no-at-sign"),
            Err(LocateError::InvalidIdentifier(_))
        ));
        assert!(matches!(
            RunId::parse("tag@"),
            Err(LocateError::InvalidIdentifier(_))
        ));
    }

    #[test]
    fn test_parse_id_list() {
        let text = "# assigned ids\na@x__y-1\n\n  b@x__y-2  \n#c@x__y-3\n";
        assert_eq!(parse_id_list(text), vec!["a@x__y-1", "b@x__y-2"]);
    }
}
