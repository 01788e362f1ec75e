use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Force a priority onto every signal whose file path matches `pattern`.
///
/// Patterns are globs; a `**` segment recurses into directories. When a list
/// of overrides is applied, the first match in list order wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorityOverride {
    pub pattern: String,
    pub priority: u8,
}

impl PriorityOverride {
    pub fn new(pattern: impl Into<String>, priority: i64) -> Result<Self, CoreError> {
        if !(1..=4).contains(&priority) {
            return Err(CoreError::InvalidPriority(priority));
        }
        Ok(Self {
            pattern: pattern.into(),
            priority: priority as u8,
        })
    }

    /// Parse `PATTERN=P`, e.g. `auth/**=1`. The last `=` separates the priority.
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        let (pattern, priority) = raw
            .rsplit_once('=')
            .ok_or_else(|| CoreError::Config(format!("expected PATTERN=PRIORITY, got '{raw}'")))?;
        let pattern = pattern.trim();
        if pattern.is_empty() {
            return Err(CoreError::Config(format!("empty pattern in '{raw}'")));
        }
        let priority = priority
            .trim()
            .trim_start_matches(['P', 'p'])
            .parse::<i64>()
            .map_err(|e| CoreError::Config(format!("bad priority in '{raw}': {e}")))?;
        Self::new(pattern, priority)
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if !(1..=4).contains(&self.priority) {
            return Err(CoreError::InvalidPriority(self.priority as i64));
        }
        Ok(())
    }
}
