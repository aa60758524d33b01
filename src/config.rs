use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Environment variable read by [`CompilerConfig::from_env`]
pub const REPRESENTATION_ENV: &str = "PAGEQUERY_REPRESENTATION";

/// Predicate shape produced for the deployment's storage backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Representation {
    /// sea-orm `Condition` for SQL databases
    #[default]
    Condition,
    /// Serializable `Criteria` tree for document stores
    Criteria,
}

impl Representation {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Condition => "condition",
            Self::Criteria => "criteria",
        }
    }
}

impl fmt::Display for Representation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown predicate representation '{0}', expected 'condition' or 'criteria'")]
pub struct UnknownRepresentation(pub String);

impl FromStr for Representation {
    type Err = UnknownRepresentation;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "condition" => Ok(Self::Condition),
            "criteria" => Ok(Self::Criteria),
            _ => Err(UnknownRepresentation(s.to_string())),
        }
    }
}

/// Deployment-wide compiler settings, chosen once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    pub representation: Representation,
}

impl CompilerConfig {
    #[must_use]
    pub const fn new(representation: Representation) -> Self {
        Self { representation }
    }

    /// Read settings from the environment, falling back to defaults.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownRepresentation`] if `PAGEQUERY_REPRESENTATION` is set
    /// to something other than `condition` or `criteria`.
    pub fn from_env() -> Result<Self, UnknownRepresentation> {
        match std::env::var(REPRESENTATION_ENV) {
            Ok(raw) => Ok(Self::new(raw.parse()?)),
            Err(_) => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_representation() {
        assert_eq!("Criteria".parse(), Ok(Representation::Criteria));
        assert_eq!(" condition ".parse(), Ok(Representation::Condition));
        assert_eq!(
            "mongo".parse::<Representation>(),
            Err(UnknownRepresentation("mongo".to_string()))
        );
    }

    #[test]
    fn test_config_defaults() {
        let config: CompilerConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.representation, Representation::Condition);

        let config: CompilerConfig =
            serde_json::from_str(r#"{"representation": "criteria"}"#).unwrap();
        assert_eq!(config.representation, Representation::Criteria);
    }
}
