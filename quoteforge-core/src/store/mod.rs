//! Local-first sync store.
//!
//! One logical record per (domain, owner): persisted to a durable local
//! cache, opportunistically mirrored to a remote store when an owner is
//! logged in. Load precedence is remote (merged per domain rule), then the
//! scoped local cache, then the legacy unscoped key (migrated forward),
//! then the domain default.

mod cache;
mod events;
mod merge;
mod remote;
mod sync_store;

pub use cache::{CacheError, FileCache, LocalCache};
pub use events::{Advisory, AdvisoryBus};
pub use merge::{merge_for, strategy_for, MergeStrategy};
pub use remote::{HttpRemoteStore, RemoteError, RemoteStore};
pub use sync_store::SyncStore;

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;

use crate::models::{Basket, BusinessProfile, PriceOverrides, QuoteHistory, QuoteSettings};

/// A named category of per-owner data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Domain {
    Profile,
    Basket,
    History,
    Settings,
    PriceOverrides,
}

impl Domain {
    pub const ALL: [Domain; 5] = [
        Domain::Profile,
        Domain::Basket,
        Domain::History,
        Domain::Settings,
        Domain::PriceOverrides,
    ];

    /// Stable wire/storage name for this domain.
    pub fn name(&self) -> &'static str {
        match self {
            Domain::Profile => "profile",
            Domain::Basket => "basket",
            Domain::History => "history",
            Domain::Settings => "settings",
            Domain::PriceOverrides => "priceOverrides",
        }
    }

    /// Parse from the stable name.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "profile" => Some(Domain::Profile),
            "basket" => Some(Domain::Basket),
            "history" => Some(Domain::History),
            "settings" => Some(Domain::Settings),
            "priceOverrides" => Some(Domain::PriceOverrides),
            _ => None,
        }
    }

    /// Scoped local cache key: `{domain}_{userId-or-"guest"}`.
    pub fn cache_key(&self, owner: &Owner) -> String {
        format!("{}_{}", self.name(), owner.key_part())
    }

    /// Pre-multi-user cache key, checked once and migrated forward.
    pub fn legacy_key(&self) -> &'static str {
        self.name()
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// The identity that owns a set of domain records.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Owner {
    /// Anonymous owner used when no user is logged in
    #[default]
    Guest,
    User(String),
}

impl Owner {
    pub fn from_user_id(user_id: Option<String>) -> Self {
        match user_id {
            Some(id) if !id.is_empty() => Owner::User(id),
            _ => Owner::Guest,
        }
    }

    pub fn user_id(&self) -> Option<&str> {
        match self {
            Owner::Guest => None,
            Owner::User(id) => Some(id),
        }
    }

    /// The cache-key fragment for this owner.
    pub fn key_part(&self) -> &str {
        match self {
            Owner::Guest => "guest",
            Owner::User(id) => id,
        }
    }
}

impl fmt::Display for Owner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key_part())
    }
}

/// A payload type bound to one sync-store domain.
pub trait DomainPayload:
    Serialize + DeserializeOwned + Default + Clone + PartialEq + Send + Sync + 'static
{
    const DOMAIN: Domain;

    /// True when the payload carries no data worth caching. The store
    /// deletes the local cache entry instead of persisting such payloads.
    fn is_empty_payload(&self) -> bool {
        false
    }
}

impl DomainPayload for BusinessProfile {
    const DOMAIN: Domain = Domain::Profile;
}

impl DomainPayload for Basket {
    const DOMAIN: Domain = Domain::Basket;

    // Storage hygiene: an empty basket clears its cache entry.
    fn is_empty_payload(&self) -> bool {
        self.is_empty()
    }
}

impl DomainPayload for QuoteHistory {
    const DOMAIN: Domain = Domain::History;
}

impl DomainPayload for QuoteSettings {
    const DOMAIN: Domain = Domain::Settings;
}

impl DomainPayload for PriceOverrides {
    const DOMAIN: Domain = Domain::PriceOverrides;
}
