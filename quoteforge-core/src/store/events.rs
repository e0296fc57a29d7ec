//! Advisory signals for degraded conditions.
//!
//! These are notifications, not errors: a failed background push or an
//! exhausted cache quota leaves in-memory state correct, and the UI layer
//! may choose to surface the condition. Nobody is required to listen.

use tokio::sync::broadcast;

use super::Domain;

/// A non-fatal notification of a degraded condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advisory {
    /// A background remote push failed; local state is intact.
    SyncFailed { domain: Domain },
    /// A local cache write was refused for size; persistence is degraded.
    StorageExhausted { domain: Domain },
}

/// Broadcast channel for advisory signals, owned by the sync store.
#[derive(Debug, Clone)]
pub struct AdvisoryBus {
    tx: broadcast::Sender<Advisory>,
}

impl AdvisoryBus {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(32);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Advisory> {
        self.tx.subscribe()
    }

    /// Publish an advisory. Having no subscribers is fine.
    pub fn publish(&self, advisory: Advisory) {
        let _ = self.tx.send(advisory);
    }
}

impl Default for AdvisoryBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subscribe_receives_published_advisories() {
        let bus = AdvisoryBus::new();
        let mut rx = bus.subscribe();

        bus.publish(Advisory::SyncFailed {
            domain: Domain::Basket,
        });

        assert_eq!(
            rx.try_recv().unwrap(),
            Advisory::SyncFailed {
                domain: Domain::Basket
            }
        );
    }

    #[test]
    fn test_publish_without_subscribers_is_ok() {
        let bus = AdvisoryBus::new();
        bus.publish(Advisory::StorageExhausted {
            domain: Domain::Profile,
        });
    }
}
