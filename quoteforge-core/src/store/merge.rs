//! Per-domain reconciliation of local and remote payloads.
//!
//! Most domains take the remote payload as-is when one exists. The profile
//! domain is the single special case: fields edited locally (a logo, a
//! phone number) must not be clobbered by a remote echo that predates the
//! edit, so local non-empty fields overlay the remote record.

use serde_json::Value;

use super::Domain;

/// How a domain reconciles a local cached payload with a remote one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeStrategy {
    /// The remote payload is taken as-is.
    RemoteWins,
    /// Remote is the base; local non-empty fields overlay it.
    PreferLocalFields,
}

/// The strategy table. Profile is the only overlay domain; do not
/// generalize this without a product decision.
pub fn strategy_for(domain: Domain) -> MergeStrategy {
    match domain {
        Domain::Profile => MergeStrategy::PreferLocalFields,
        _ => MergeStrategy::RemoteWins,
    }
}

/// Merge a local cached payload into a remote one per the domain's
/// strategy. `local` is `None` when nothing is cached.
pub fn merge_for(domain: Domain, local: Option<&Value>, remote: &Value) -> Value {
    match strategy_for(domain) {
        MergeStrategy::RemoteWins => remote.clone(),
        MergeStrategy::PreferLocalFields => overlay_local_fields(local, remote),
    }
}

fn overlay_local_fields(local: Option<&Value>, remote: &Value) -> Value {
    let mut merged = remote.clone();

    let (Some(Value::Object(local_map)), Value::Object(merged_map)) = (local, &mut merged) else {
        return merged;
    };

    for (key, local_value) in local_map {
        if !is_empty_field(local_value) {
            merged_map.insert(key.clone(), local_value.clone());
        }
    }

    merged
}

fn is_empty_field(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}
