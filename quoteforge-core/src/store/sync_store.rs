//! The local-first sync store.
//!
//! For each domain and the current owner the store resolves one
//! authoritative payload, backed by the durable local cache and mirrored
//! to the remote store on a best-effort basis.
//!
//! The core correctness rule: a save never reaches remote before a load
//! has confirmed the remote state for that exact owner. Otherwise a fresh
//! login could overwrite previously-synced data with this session's
//! defaults. The per-domain "loaded-for" markers enforce this, and
//! `switch_owner` resets them.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use serde_json::Value;

use super::{
    merge, Advisory, AdvisoryBus, Domain, DomainPayload, LocalCache, Owner, RemoteStore,
};

/// Local-first store for per-owner domain records.
pub struct SyncStore<R: RemoteStore + 'static> {
    cache: Arc<dyn LocalCache>,
    remote: Option<Arc<R>>,
    owner: Owner,
    /// Which owner each domain's last confirmed remote load was for.
    loaded_for: HashMap<Domain, Owner>,
    advisories: AdvisoryBus,
    pushes: Vec<JoinHandle<()>>,
}

impl<R: RemoteStore + 'static> SyncStore<R> {
    /// Create a store for the given owner. `remote` may be `None` when
    /// sync is not configured; the store then runs local-only.
    pub fn new(cache: Arc<dyn LocalCache>, remote: Option<Arc<R>>, owner: Owner) -> Self {
        Self {
            cache,
            remote,
            owner,
            loaded_for: HashMap::new(),
            advisories: AdvisoryBus::new(),
            pushes: Vec::new(),
        }
    }

    pub fn owner(&self) -> &Owner {
        &self.owner
    }

    /// Subscribe to advisory signals (sync failures, quota exhaustion).
    pub fn advisories(&self) -> broadcast::Receiver<Advisory> {
        self.advisories.subscribe()
    }

    /// Switch to a new owner identity.
    ///
    /// Clears all loaded-for markers, so no save for the new owner can
    /// reach remote until a load has completed for it.
    pub fn switch_owner(&mut self, owner: Owner) {
        if owner != self.owner {
            debug!(from = %self.owner, to = %owner, "switching owner");
            self.owner = owner;
        }
        self.loaded_for.clear();
    }

    /// Load the payload for `T`'s domain and the current owner.
    ///
    /// Precedence: remote record (merged per the domain's strategy, local
    /// cache rewritten, reconcile push issued when the merge changed the
    /// remote image) → scoped local cache → legacy unscoped key (migrated
    /// forward) → `T::default()`. A reachable server with no record
    /// confirms the owner without displacing local data. Remote failure is
    /// never fatal.
    pub async fn load<T: DomainPayload>(&mut self) -> T {
        let domain = T::DOMAIN;
        let owner = self.owner.clone();
        let user_id = owner.user_id().map(str::to_string);

        if let (Some(remote), Some(user_id)) = (self.remote.clone(), user_id) {
            match remote.fetch(domain, &user_id).await {
                Ok(Some(remote_value)) => {
                    let local_value = self.local_value_for_merge(domain, &owner);
                    let merged = merge::merge_for(domain, local_value.as_ref(), &remote_value);

                    match serde_json::from_value::<T>(merged.clone()) {
                        Ok(payload) => {
                            self.write_cache(domain, &owner, &merged);
                            if merged != remote_value {
                                self.spawn_push(domain, user_id, merged);
                            }
                            self.loaded_for.insert(domain, owner);
                            return payload;
                        }
                        Err(e) => {
                            debug!(%domain, error = %e, "malformed remote payload, using local");
                        }
                    }
                }
                Ok(None) => {
                    // Server reachable but holds no record yet. Local data
                    // stays authoritative; the confirmed round-trip still
                    // unlocks pushes for this owner.
                    self.loaded_for.insert(domain, owner.clone());
                    return self.load_local::<T>(&owner);
                }
                Err(e) => {
                    if !e.is_expected() {
                        debug!(%domain, error = %e, "remote fetch failed, using local cache");
                    }
                }
            }
        }

        self.load_local::<T>(&owner)
    }

    /// Save the payload for `T`'s domain and the current owner.
    ///
    /// The local cache is always written. A remote push is issued only
    /// when the owner is a logged-in user whose loaded-for marker matches,
    /// and it runs as a background task: failures are logged and signaled,
    /// never returned to the caller.
    pub async fn save<T: DomainPayload>(&mut self, payload: &T) {
        let domain = T::DOMAIN;
        let owner = self.owner.clone();

        let value = match serde_json::to_value(payload) {
            Ok(value) => value,
            Err(e) => {
                warn!(%domain, error = %e, "payload serialization failed, nothing saved");
                return;
            }
        };

        if payload.is_empty_payload() {
            // Storage hygiene: drop the cache entry instead of storing
            // an empty payload.
            self.cache.delete(&domain.cache_key(&owner));
        } else {
            self.write_cache(domain, &owner, &value);
        }

        if self.remote.is_some() {
            if let Some(user_id) = owner.user_id().map(str::to_string) {
                if self.loaded_for.get(&domain) == Some(&owner) {
                    self.spawn_push(domain, user_id, value);
                } else {
                    debug!(%domain, %owner, "skipping remote push before initial load");
                }
            }
        }
    }

    /// Await all outstanding background pushes.
    ///
    /// Used at shutdown so in-flight pushes are not dropped mid-request;
    /// provides no ordering guarantee between pushes.
    pub async fn flush(&mut self) {
        for handle in self.pushes.drain(..) {
            let _ = handle.await;
        }
    }

    fn spawn_push(&mut self, domain: Domain, user_id: String, value: Value) {
        let Some(remote) = self.remote.clone() else {
            return;
        };
        let bus = self.advisories.clone();

        let handle = tokio::spawn(async move {
            if let Err(e) = remote.push(domain, &user_id, &value).await {
                warn!(%domain, user = %user_id, error = %e, "remote push failed");
                bus.publish(Advisory::SyncFailed { domain });
            }
        });
        self.pushes.push(handle);
    }

    fn write_cache(&self, domain: Domain, owner: &Owner, value: &Value) {
        let key = domain.cache_key(owner);
        match self.cache.set(&key, &value.to_string()) {
            Ok(true) => {}
            Ok(false) => {
                warn!(%domain, "local cache quota exhausted");
                self.advisories.publish(Advisory::StorageExhausted { domain });
            }
            Err(e) => {
                warn!(%domain, error = %e, "local cache write failed");
            }
        }
    }

    /// The local payload used as the merge overlay source: the scoped
    /// cache for this owner, the legacy key (migrated forward on first
    /// read), or, for a logged-in user, the guest-scoped entry, which
    /// carries edits made before login.
    fn local_value_for_merge(&self, domain: Domain, owner: &Owner) -> Option<Value> {
        let scoped_key = domain.cache_key(owner);
        if let Some(value) = self.read_cache_value(domain, &scoped_key) {
            return Some(value);
        }

        if let Some(raw) = self.cache.get(domain.legacy_key()) {
            match serde_json::from_str(&raw) {
                Ok(value) => {
                    self.migrate_legacy(domain, &scoped_key, &raw);
                    return Some(value);
                }
                Err(e) => debug!(%domain, error = %e, "unreadable legacy cache entry"),
            }
        }

        if owner.user_id().is_some() {
            return self.read_cache_value(domain, &domain.cache_key(&Owner::Guest));
        }
        None
    }

    fn read_cache_value(&self, domain: Domain, key: &str) -> Option<Value> {
        let raw = self.cache.get(key)?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                debug!(%domain, key, error = %e, "unreadable cache entry");
                None
            }
        }
    }

    /// One-time migration of a legacy unscoped entry into the scoped
    /// layout. The legacy key is deleted only once the copy succeeded.
    fn migrate_legacy(&self, domain: Domain, scoped_key: &str, raw: &str) {
        if let Err(e) = self.cache.set(scoped_key, raw) {
            warn!(%domain, error = %e, "legacy cache migration failed");
        } else {
            self.cache.delete(domain.legacy_key());
        }
    }

    /// Local fallback: scoped cache, then legacy key (migrated forward
    /// and deleted), then the domain default.
    fn load_local<T: DomainPayload>(&self, owner: &Owner) -> T {
        let domain = T::DOMAIN;
        let scoped_key = domain.cache_key(owner);

        if let Some(raw) = self.cache.get(&scoped_key) {
            match serde_json::from_str(&raw) {
                Ok(payload) => return payload,
                Err(e) => {
                    debug!(%domain, error = %e, "unreadable scoped cache entry, using default");
                    return T::default();
                }
            }
        }

        if let Some(raw) = self.cache.get(domain.legacy_key()) {
            if let Ok(payload) = serde_json::from_str::<T>(&raw) {
                self.migrate_legacy(domain, &scoped_key, &raw);
                return payload;
            }
        }

        T::default()
    }
}
