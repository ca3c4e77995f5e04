//! Chained defaults for optional text fields.

/// The first usable value of a candidate chain.
///
/// Absent and blank candidates are skipped:
///
/// ```ignore
/// Fallback::first(name).or(id).otherwise("N/A (Corrupt)")
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fallback<'a>(Option<&'a str>);

impl<'a> Fallback<'a> {
    /// Start a chain with the preferred candidate.
    pub fn first(candidate: Option<&'a str>) -> Self {
        Self(usable(candidate))
    }

    /// Try `candidate` if nothing usable was found yet.
    pub fn or(self, candidate: Option<&'a str>) -> Self {
        match self.0 {
            Some(_) => self,
            None => Self(usable(candidate)),
        }
    }

    /// The chosen value, or `default` if every candidate was missing.
    pub fn otherwise(self, default: &str) -> String {
        self.0.unwrap_or(default).to_string()
    }
}

fn usable(candidate: Option<&str>) -> Option<&str> {
    candidate.filter(|value| !value.trim().is_empty())
}
