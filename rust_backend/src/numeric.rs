//! Process-wide floating point policy.
//!
//! The scheduler works on whole columns of `f64`. An invalid operation (for
//! example `acos` of an airmass limit below 1) silently yields `NaN`, and a
//! `NaN` compares false against every threshold, so a bad tile would simply
//! never be scheduled. Under [`FloatPolicy::Raise`] such results are turned
//! into [`SchedulerError::NumericDomain`] instead.
//!
//! The policy is set once at process start with [`configure`]; later calls
//! are ignored. When never configured the policy is `Raise`.

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SchedulerError};

/// How to treat `NaN` produced by an invalid floating point operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FloatPolicy {
    /// Report invalid operations as errors
    #[default]
    Raise,
    /// Let `NaN` propagate
    Ignore,
}

static POLICY: OnceCell<FloatPolicy> = OnceCell::new();

/// Install the process-wide policy.
///
/// Returns `false` if a policy was already installed (the existing one is kept).
pub fn configure(policy: FloatPolicy) -> bool {
    POLICY.set(policy).is_ok()
}

/// The active policy.
pub fn policy() -> FloatPolicy {
    POLICY.get().copied().unwrap_or_default()
}

/// Check a single value against the active policy.
pub fn checked(value: f64, context: &str) -> Result<f64> {
    checked_with(policy(), value, context)
}

/// Check every value of a column against the active policy.
pub fn checked_column(values: &[f64], context: &str) -> Result<()> {
    let policy = policy();
    for (idx, &v) in values.iter().enumerate() {
        checked_with(policy, v, context).map_err(|_| {
            SchedulerError::NumericDomain(format!("{} (row {})", context, idx))
        })?;
    }
    Ok(())
}

fn checked_with(policy: FloatPolicy, value: f64, context: &str) -> Result<f64> {
    if value.is_nan() && policy == FloatPolicy::Raise {
        return Err(SchedulerError::NumericDomain(context.to_string()));
    }
    Ok(value)
}
