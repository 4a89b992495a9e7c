//! Lifetime-scoped event subscriptions.
//!
//! Handlers are not stored as closures. A subscription records which owner
//! wants which signal from which provider; the [`Desktop`](crate::desktop::Desktop)
//! routes each dispatched event to the owners returned by
//! [`SignalRegistry::subscribers`]. Tearing down either endpoint removes its
//! entries synchronously, so no handler can run for a dead owner or after a
//! provider signalled destruction.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::trace;

use crate::types::ProviderId;

/// Named lifecycle signals a surface provider can emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signal {
    Destroy,
    Map,
    Unmap,
    Commit,
    NewPopup,
    NewSubsurface,
    RequestMove,
    RequestResize,
    RequestMaximize,
    RequestFullscreen,
    RequestConfigure,
    RequestDecorationMode,
    SetState,
}

/// Handle to a single subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    fn new_unique() -> Self {
        static NEXT_ID: AtomicU64 = AtomicU64::new(1);
        SubscriptionId(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

#[derive(Debug, Clone)]
struct Subscription<O> {
    provider: ProviderId,
    signal: Signal,
    owner: O,
}

/// Registry of subscriptions keyed by `(provider, signal)` and by owner.
#[derive(Debug)]
pub struct SignalRegistry<O> {
    subscriptions: HashMap<SubscriptionId, Subscription<O>>,
    by_key: HashMap<(ProviderId, Signal), Vec<SubscriptionId>>,
    by_owner: HashMap<O, Vec<SubscriptionId>>,
}

impl<O> Default for SignalRegistry<O> {
    fn default() -> Self {
        Self {
            subscriptions: HashMap::new(),
            by_key: HashMap::new(),
            by_owner: HashMap::new(),
        }
    }
}

impl<O: Copy + Eq + Hash + std::fmt::Debug> SignalRegistry<O> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `owner` to `signal` emitted by `provider`.
    pub fn subscribe(&mut self, provider: ProviderId, signal: Signal, owner: O) -> SubscriptionId {
        let id = SubscriptionId::new_unique();
        self.subscriptions.insert(id, Subscription { provider, signal, owner });
        self.by_key.entry((provider, signal)).or_default().push(id);
        self.by_owner.entry(owner).or_default().push(id);
        trace!(%provider, ?signal, ?owner, "Subscribed");
        id
    }

    /// Subscribes `owner` to every signal in `signals`.
    pub fn subscribe_all(&mut self, provider: ProviderId, signals: &[Signal], owner: O) {
        for signal in signals {
            self.subscribe(provider, *signal, owner);
        }
    }

    /// Owners subscribed to `(provider, signal)`, in subscription order.
    ///
    /// The list is a snapshot: handlers may revoke subscriptions while the
    /// caller iterates it, so each owner must be re-validated before use.
    pub fn subscribers(&self, provider: ProviderId, signal: Signal) -> Vec<O> {
        self.by_key
            .get(&(provider, signal))
            .map(|ids| {
                ids.iter()
                    .filter_map(|id| self.subscriptions.get(id).map(|s| s.owner))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Removes a single subscription.
    pub fn unsubscribe(&mut self, id: SubscriptionId) {
        if let Some(subscription) = self.subscriptions.remove(&id) {
            Self::remove_from(&mut self.by_key, (subscription.provider, subscription.signal), id);
            Self::remove_from(&mut self.by_owner, subscription.owner, id);
        }
    }

    /// Revokes every subscription held by `owner`.
    pub fn revoke_owner(&mut self, owner: O) {
        let Some(ids) = self.by_owner.remove(&owner) else {
            return;
        };
        for id in ids {
            if let Some(subscription) = self.subscriptions.remove(&id) {
                Self::remove_from(&mut self.by_key, (subscription.provider, subscription.signal), id);
            }
        }
        trace!(?owner, "Revoked owner subscriptions");
    }

    /// Revokes every subscription to signals of `provider`.
    pub fn revoke_provider(&mut self, provider: ProviderId) {
        let keys: Vec<_> = self
            .by_key
            .keys()
            .filter(|(p, _)| *p == provider)
            .copied()
            .collect();
        for key in keys {
            for id in self.by_key.remove(&key).unwrap_or_default() {
                if let Some(subscription) = self.subscriptions.remove(&id) {
                    Self::remove_from(&mut self.by_owner, subscription.owner, id);
                }
            }
        }
        trace!(%provider, "Revoked provider subscriptions");
    }

    /// Whether `owner` still holds any subscription.
    pub fn has_owner(&self, owner: O) -> bool {
        self.by_owner.get(&owner).is_some_and(|ids| !ids.is_empty())
    }

    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }

    fn remove_from<K: Eq + Hash>(map: &mut HashMap<K, Vec<SubscriptionId>>, key: K, id: SubscriptionId) {
        if let Some(ids) = map.get_mut(&key) {
            ids.retain(|other| *other != id);
            if ids.is_empty() {
                map.remove(&key);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Owner {
        A,
        B,
    }

    #[test]
    fn subscribers_are_returned_in_order() {
        let mut registry = SignalRegistry::new();
        registry.subscribe(ProviderId(1), Signal::Commit, Owner::B);
        registry.subscribe(ProviderId(1), Signal::Commit, Owner::A);
        registry.subscribe(ProviderId(1), Signal::Destroy, Owner::A);

        assert_eq!(registry.subscribers(ProviderId(1), Signal::Commit), vec![Owner::B, Owner::A]);
        assert_eq!(registry.subscribers(ProviderId(1), Signal::Destroy), vec![Owner::A]);
        assert!(registry.subscribers(ProviderId(2), Signal::Commit).is_empty());
    }

    #[test]
    fn revoking_owner_removes_all_its_subscriptions() {
        let mut registry = SignalRegistry::new();
        registry.subscribe_all(ProviderId(1), &[Signal::Commit, Signal::Map], Owner::A);
        registry.subscribe(ProviderId(2), Signal::Commit, Owner::A);
        registry.subscribe(ProviderId(1), Signal::Commit, Owner::B);

        registry.revoke_owner(Owner::A);

        assert!(!registry.has_owner(Owner::A));
        assert_eq!(registry.subscribers(ProviderId(1), Signal::Commit), vec![Owner::B]);
        assert!(registry.subscribers(ProviderId(2), Signal::Commit).is_empty());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn revoking_provider_removes_all_its_signals() {
        let mut registry = SignalRegistry::new();
        registry.subscribe_all(ProviderId(1), &[Signal::Commit, Signal::Destroy], Owner::A);
        registry.subscribe(ProviderId(2), Signal::Commit, Owner::A);

        registry.revoke_provider(ProviderId(1));

        assert!(registry.subscribers(ProviderId(1), Signal::Destroy).is_empty());
        assert_eq!(registry.subscribers(ProviderId(2), Signal::Commit), vec![Owner::A]);
        assert!(registry.has_owner(Owner::A));
    }

    #[test]
    fn unsubscribe_single() {
        let mut registry = SignalRegistry::new();
        let id = registry.subscribe(ProviderId(3), Signal::Unmap, Owner::A);
        registry.unsubscribe(id);
        assert!(registry.is_empty());
        assert!(!registry.has_owner(Owner::A));
    }
}
