//! Request validation.
//!
//! Every structural problem with a request is caught here, before any model
//! is built. Error messages name the offending field, the rule it violated,
//! and the value seen, so callers can surface them directly.

use super::EngineError;
use crate::models::SolveRequest;
use std::collections::HashSet;

/// Validates the window, the policy, and person identities.
pub fn validate(request: &SolveRequest) -> Result<(), EngineError> {
    let window = &request.window;
    if window.end < window.start {
        return Err(EngineError::InvalidWindow(format!(
            "field `window.end`: must not precede `window.start` (got start={}, end={})",
            window.start, window.end
        )));
    }
    if request.people.is_empty() {
        return Err(EngineError::InvalidWindow(
            "field `people`: must contain at least one person (got an empty list)".to_string(),
        ));
    }

    validate_policy(request)?;
    validate_identities(request)?;
    Ok(())
}

fn validate_policy(request: &SolveRequest) -> Result<(), EngineError> {
    let policy = &request.policy;
    let window_length = request.window.length();

    if policy.max_consecutive_base < 1 {
        return Err(EngineError::InvalidPolicy(format!(
            "field `max_consecutive_base`: must be at least 1 (got {})",
            policy.max_consecutive_base
        )));
    }
    if policy.max_consecutive_home < 1 {
        return Err(EngineError::InvalidPolicy(format!(
            "field `max_consecutive_home`: must be at least 1 (got {})",
            policy.max_consecutive_home
        )));
    }
    if policy.min_base_block < 1 {
        return Err(EngineError::InvalidPolicy(format!(
            "field `min_base_block`: must be at least 1 (got {})",
            policy.min_base_block
        )));
    }
    if policy.min_base_block > policy.max_consecutive_base {
        return Err(EngineError::InvalidPolicy(format!(
            "field `min_base_block`: must not exceed `max_consecutive_base` (got {} > {})",
            policy.min_base_block, policy.max_consecutive_base
        )));
    }
    if policy.weekend_only_max_base < 1 {
        return Err(EngineError::InvalidPolicy(format!(
            "field `weekend_only_max_base`: must be at least 1 (got {})",
            policy.weekend_only_max_base
        )));
    }
    if policy.constraint_safety_margin_pct > 100 {
        return Err(EngineError::InvalidPolicy(format!(
            "field `constraint_safety_margin_pct`: must be between 0 and 100 (got {})",
            policy.constraint_safety_margin_pct
        )));
    }
    if policy.time_budget_seconds < 1 {
        return Err(EngineError::InvalidPolicy(format!(
            "field `time_budget_seconds`: must be at least 1 (got {})",
            policy.time_budget_seconds
        )));
    }
    for (field, value) in [
        ("home_balance_weight", policy.home_balance_weight),
        ("weekend_fairness_weight", policy.weekend_fairness_weight),
    ] {
        if !value.is_finite() || value < 0.0 {
            return Err(EngineError::InvalidPolicy(format!(
                "field `{}`: must be a non-negative finite number (got {})",
                field, value
            )));
        }
    }
    if let (Some(base), Some(home)) = (policy.default_base_target, policy.default_home_target) {
        if base + home > window_length {
            return Err(EngineError::InvalidPolicy(format!(
                "field `default_base_target`: targets must fit the window \
                 (got {} + {} > {} days)",
                base, home, window_length
            )));
        }
    }

    for person in &request.people {
        if let Some(cap) = person.max_consecutive_base {
            if cap < 1 {
                return Err(EngineError::InvalidPolicy(format!(
                    "field `max_consecutive_base` of person `{}`: must be at least 1 (got {})",
                    person.id, cap
                )));
            }
        }
        if let Some(cap) = person.max_consecutive_home {
            if cap < 1 {
                return Err(EngineError::InvalidPolicy(format!(
                    "field `max_consecutive_home` of person `{}`: must be at least 1 (got {})",
                    person.id, cap
                )));
            }
        }
        if let (Some(base), Some(home)) = (person.base_target, person.home_target) {
            if base + home > window_length {
                return Err(EngineError::InvalidPolicy(format!(
                    "field `base_target` of person `{}`: targets must fit the window \
                     (got {} + {} > {} days)",
                    person.id, base, home, window_length
                )));
            }
        }
    }

    Ok(())
}

fn validate_identities(request: &SolveRequest) -> Result<(), EngineError> {
    let mut ids = HashSet::new();
    let mut names = HashSet::new();
    for person in &request.people {
        if !ids.insert(person.id.as_str()) {
            return Err(EngineError::DuplicateIdentity(format!(
                "field `id`: must be unique within a solve (got `{}` twice)",
                person.id
            )));
        }
        if !names.insert(person.name.as_str()) {
            return Err(EngineError::DuplicateIdentity(format!(
                "field `name`: must be unique within a solve (got `{}` twice)",
                person.name
            )));
        }
    }
    Ok(())
}
