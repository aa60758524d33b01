use serde::{Deserialize, Serialize};
use std::fmt;

/// Comparison operators accepted in a filter clause.
///
/// The set is closed. Tokens outside it are not rejected, they degrade to
/// [`Operation::Eq`] through [`Operation::normalize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Operation {
    /// Equality (=)
    Eq,
    /// Not equal (!=)
    Ne,
    /// Greater than (>)
    Gt,
    /// Greater than or equal (>=)
    Get,
    /// Less than (<)
    Lt,
    /// Less than or equal (<=)
    Let,
    /// Substring match
    Like,
    /// Prefix match
    #[serde(rename = "STARTSWITH")]
    StartsWith,
    /// Suffix match
    #[serde(rename = "ENDSWITH")]
    EndsWith,
}

impl Operation {
    /// Every supported operator, in declaration order.
    pub const ALL: [Self; 9] = [
        Self::Eq,
        Self::Ne,
        Self::Gt,
        Self::Get,
        Self::Lt,
        Self::Let,
        Self::Like,
        Self::StartsWith,
        Self::EndsWith,
    ];

    /// Canonical uppercase token for this operator
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Eq => "EQ",
            Self::Ne => "NE",
            Self::Gt => "GT",
            Self::Get => "GET",
            Self::Lt => "LT",
            Self::Let => "LET",
            Self::Like => "LIKE",
            Self::StartsWith => "STARTSWITH",
            Self::EndsWith => "ENDSWITH",
        }
    }

    /// Look up an operator token, ignoring case and surrounding whitespace.
    #[must_use]
    pub fn parse(token: &str) -> Option<Self> {
        let token = token.trim();
        Self::ALL
            .into_iter()
            .find(|op| op.as_str().eq_ignore_ascii_case(token))
    }

    /// Resolve a client-supplied operator token.
    ///
    /// Missing, empty and unknown tokens all resolve to [`Operation::Eq`];
    /// this never fails.
    #[must_use]
    pub fn normalize(token: Option<&str>) -> Self {
        match token {
            Some(raw) => Self::parse(raw).unwrap_or_else(|| {
                if !raw.trim().is_empty() {
                    tracing::debug!(operation = %raw, "Unknown filter operation, falling back to EQ");
                }
                Self::Eq
            }),
            None => Self::Eq,
        }
    }

    /// Pattern operators only make sense on text fields
    #[must_use]
    pub const fn is_pattern(self) -> bool {
        matches!(self, Self::Like | Self::StartsWith | Self::EndsWith)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
