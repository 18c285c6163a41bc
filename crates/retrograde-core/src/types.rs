//! Core types for Retrograde

use serde::{Deserialize, Serialize};

/// Process model used to run a generated cross-version test task
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionStrategy {
    /// Run tests in the same process as the build
    Embedded,
    /// Fork tests into an isolated process
    Forking,
}

impl ExecutionStrategy {
    /// All supported strategies, in declaration order
    pub const fn all() -> [ExecutionStrategy; 2] {
        [Self::Embedded, Self::Forking]
    }

    /// Returns the string representation of the strategy
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Embedded => "embedded",
            Self::Forking => "forking",
        }
    }

    /// Whether this is the default strategy (exactly one strategy is)
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

impl Default for ExecutionStrategy {
    fn default() -> Self {
        Self::Embedded
    }
}

impl std::fmt::Display for ExecutionStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ExecutionStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "embedded" => Ok(Self::Embedded),
            "forking" => Ok(Self::Forking),
            _ => Err(format!("Unknown execution strategy: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_display() {
        assert_eq!(ExecutionStrategy::Embedded.to_string(), "embedded");
        assert_eq!(ExecutionStrategy::Forking.to_string(), "forking");
    }

    #[test]
    fn test_strategy_parse() {
        assert_eq!(
            "forking".parse::<ExecutionStrategy>().unwrap(),
            ExecutionStrategy::Forking
        );
        assert_eq!(
            "Embedded".parse::<ExecutionStrategy>().unwrap(),
            ExecutionStrategy::Embedded
        );
        assert!("inline".parse::<ExecutionStrategy>().is_err());
    }

    #[test]
    fn test_exactly_one_default_strategy() {
        let defaults: Vec<_> = ExecutionStrategy::all()
            .into_iter()
            .filter(ExecutionStrategy::is_default)
            .collect();
        assert_eq!(defaults, vec![ExecutionStrategy::Embedded]);
    }
}
