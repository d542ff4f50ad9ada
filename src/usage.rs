//! Per-mode token usage accounting.

use crate::error::{Result, SummitError};
use crate::mode::Mode;
use serde::{Deserialize, Serialize};

/// Token counts reported by a single backend reply.
///
/// Fields are signed so a misbehaving backend is caught by validation instead
/// of failing deserialization.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageDelta {
    #[serde(default)]
    pub input_tokens: i64,
    #[serde(default)]
    pub output_tokens: i64,
    #[serde(default)]
    pub total_tokens: i64,
}

impl UsageDelta {
    pub fn new(input_tokens: i64, output_tokens: i64, total_tokens: i64) -> Self {
        Self {
            input_tokens,
            output_tokens,
            total_tokens,
        }
    }

    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("input_tokens", self.input_tokens),
            ("output_tokens", self.output_tokens),
            ("total_tokens", self.total_tokens),
        ];
        for (name, value) in fields {
            if value < 0 {
                return Err(SummitError::InvalidUsageDelta(format!(
                    "{} is negative ({})",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

/// Running totals for one mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct UsageTotals {
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub total_tokens: u64,
}

impl UsageTotals {
    pub fn is_empty(&self) -> bool {
        self.input_tokens == 0 && self.output_tokens == 0 && self.total_tokens == 0
    }
}

/// Folds usage deltas into independent per-mode totals.
#[derive(Debug, Clone, Default)]
pub struct UsageAccumulator {
    summary: UsageTotals,
    chat: UsageTotals,
}

impl UsageAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `delta` to the totals of `mode` and return the new totals.
    /// A delta with any negative field is rejected and nothing changes.
    pub fn apply_usage(&mut self, mode: Mode, delta: UsageDelta) -> Result<UsageTotals> {
        delta.validate()?;

        let totals = self.bucket_mut(mode);
        totals.input_tokens = totals.input_tokens.saturating_add(delta.input_tokens as u64);
        totals.output_tokens = totals.output_tokens.saturating_add(delta.output_tokens as u64);
        totals.total_tokens = totals.total_tokens.saturating_add(delta.total_tokens as u64);

        Ok(*totals)
    }

    pub fn totals(&self, mode: Mode) -> UsageTotals {
        match mode {
            Mode::Summary => self.summary,
            Mode::Chat => self.chat,
        }
    }

    pub fn reset(&mut self, mode: Mode) {
        *self.bucket_mut(mode) = UsageTotals::default();
    }

    fn bucket_mut(&mut self, mode: Mode) -> &mut UsageTotals {
        match mode {
            Mode::Summary => &mut self.summary,
            Mode::Chat => &mut self.chat,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_apply_accumulates() {
        let mut usage = UsageAccumulator::new();
        usage.apply_usage(Mode::Chat, UsageDelta::new(1, 1, 2)).unwrap();
        let totals = usage
            .apply_usage(Mode::Chat, UsageDelta::new(10, 5, 15))
            .unwrap();

        assert_eq!(
            totals,
            UsageTotals {
                input_tokens: 11,
                output_tokens: 6,
                total_tokens: 17,
            }
        );
    }

    #[test]
    fn test_modes_are_independent() {
        let mut usage = UsageAccumulator::new();
        usage
            .apply_usage(Mode::Summary, UsageDelta::new(100, 20, 120))
            .unwrap();

        assert!(usage.totals(Mode::Chat).is_empty());
        assert_eq!(usage.totals(Mode::Summary).total_tokens, 120);
    }

    #[test]
    fn test_negative_delta_rejected_without_mutation() {
        let mut usage = UsageAccumulator::new();
        usage.apply_usage(Mode::Chat, UsageDelta::new(3, 4, 7)).unwrap();

        let err = usage
            .apply_usage(Mode::Chat, UsageDelta::new(5, -1, 4))
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::InvalidUsageDelta);
        assert_eq!(usage.totals(Mode::Chat).total_tokens, 7);
        assert_eq!(usage.totals(Mode::Chat).input_tokens, 3);
    }

    #[test]
    fn test_reset_single_mode() {
        let mut usage = UsageAccumulator::new();
        usage.apply_usage(Mode::Chat, UsageDelta::new(1, 1, 2)).unwrap();
        usage
            .apply_usage(Mode::Summary, UsageDelta::new(2, 2, 4))
            .unwrap();

        usage.reset(Mode::Chat);

        assert!(usage.totals(Mode::Chat).is_empty());
        assert_eq!(usage.totals(Mode::Summary).total_tokens, 4);
    }

    #[test]
    fn test_delta_missing_fields_default_to_zero() {
        let delta: UsageDelta = serde_json::from_str(r#"{"input_tokens": 4}"#).unwrap();
        assert_eq!(delta, UsageDelta::new(4, 0, 0));
    }
}
