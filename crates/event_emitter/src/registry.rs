//! Listener bookkeeping: event name → priority → bucket.
//!
//! Buckets keep the most recently registered listener at the front. No
//! registry guard is ever returned to callers, so listeners can run without
//! any shard lock held and are free to mutate the registry re-entrantly.

use crate::listener::{Handler, ListenerId, ListenerRecord, Priority};
use compact_str::CompactString;
use dashmap::DashMap;
use smallvec::SmallVec;
use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::fmt::{Debug, Display};
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};

/// Default event name type: short names are stored inline.
pub type EventName = CompactString;

/// Requirements for a type used to name events.
pub trait EventKey: Clone + Eq + Hash + Debug + Display + Send + Sync + 'static {}

impl<T> EventKey for T where T: Clone + Eq + Hash + Debug + Display + Send + Sync + 'static {}

type Bucket<P> = SmallVec<[ListenerRecord<P>; 4]>;

/// A record picked for invocation by a dispatch pass.
pub(crate) struct Claimed<P> {
    pub(crate) id: ListenerId,
    pub(crate) handler: Handler<P>,
    pub(crate) once: bool,
}

pub(crate) struct Registry<K, P> {
    events: DashMap<K, BTreeMap<Priority, Bucket<P>>>,
    next_id: AtomicU64,
}

impl<K: EventKey, P> Registry<K, P> {
    pub(crate) fn new() -> Self {
        Self {
            events: DashMap::new(),
            next_id: AtomicU64::new(0),
        }
    }

    /// Places a new record at the front of its bucket, creating the bucket if needed.
    ///
    /// The id is drawn while the entry is locked so that every bucket stays
    /// sorted by descending id.
    pub(crate) fn insert(
        &self,
        event: K,
        priority: Priority,
        handler: Handler<P>,
        once: bool,
    ) -> ListenerId {
        let mut priorities = self.events.entry(event).or_default();
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        priorities
            .entry(priority)
            .or_default()
            .insert(0, ListenerRecord::new(id, handler, once));
        id
    }

    /// Ids below the watermark belong to records registered before this call.
    pub(crate) fn watermark(&self) -> u64 {
        self.next_id.load(Ordering::Relaxed)
    }

    pub(crate) fn contains<Q>(&self, event: &Q, priority: Priority, id: ListenerId) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.events
            .get(event)
            .and_then(|priorities| {
                priorities
                    .get(&priority)
                    .map(|bucket| bucket.iter().any(|record| record.id == id))
            })
            .unwrap_or(false)
    }

    /// Removes the record with `id`. Returns `false` if it was already gone.
    pub(crate) fn remove_id<Q>(&self, event: &Q, priority: Priority, id: ListenerId) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.retain_in(event, priority, |record| record.id != id) > 0
    }

    /// Removes every record at (event, priority) sharing `handler`'s identity.
    pub(crate) fn remove_handler<Q>(
        &self,
        event: &Q,
        priority: Priority,
        handler: &Handler<P>,
    ) -> usize
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.retain_in(event, priority, |record| !record.handler.same_as(handler))
    }

    /// Removes fired once records claimed by a dispatch pass.
    pub(crate) fn remove_claimed<Q>(&self, event: &Q, claimed: &[(Priority, ListenerId)])
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        for &(priority, id) in claimed {
            self.remove_id(event, priority, id);
        }
    }

    fn retain_in<Q, F>(&self, event: &Q, priority: Priority, mut keep: F) -> usize
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        F: FnMut(&ListenerRecord<P>) -> bool,
    {
        let Some(mut priorities) = self.events.get_mut(event) else {
            return 0;
        };
        let Some(bucket) = priorities.get_mut(&priority) else {
            return 0;
        };

        let before = bucket.len();
        bucket.retain(|record| keep(record));
        let removed = before - bucket.len();

        if bucket.is_empty() {
            priorities.remove(&priority);
        }
        removed
    }

    /// Priorities registered for `event`, highest first.
    pub(crate) fn priorities_desc<Q>(&self, event: &Q) -> SmallVec<[Priority; 4]>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.events
            .get(event)
            .map(|priorities| priorities.keys().rev().copied().collect())
            .unwrap_or_default()
    }

    /// Claims the next record of a bucket whose id is below `below`.
    ///
    /// Records are scanned front to back, so successive claims with the
    /// previous id as the new bound walk the bucket in LIFO order while still
    /// observing removals made in between. Once records that another pass has
    /// already claimed are skipped; a claimed once record is marked fired.
    pub(crate) fn claim_next<Q>(
        &self,
        event: &Q,
        priority: Priority,
        below: u64,
    ) -> Option<Claimed<P>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let mut priorities = self.events.get_mut(event)?;
        let bucket = priorities.get_mut(&priority)?;
        let record = bucket
            .iter_mut()
            .find(|record| record.id.0 < below && !record.fired)?;

        if record.once {
            record.fired = true;
        }
        Some(Claimed {
            id: record.id,
            handler: record.handler.clone(),
            once: record.once,
        })
    }

    /// Number of records registered for `event` across all priorities.
    pub(crate) fn listener_count<Q>(&self, event: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.events
            .get(event)
            .map(|priorities| priorities.values().map(|bucket| bucket.len()).sum())
            .unwrap_or(0)
    }

    pub(crate) fn total_listeners(&self) -> usize {
        self.events
            .iter()
            .map(|entry| entry.value().values().map(|bucket| bucket.len()).sum::<usize>())
            .sum()
    }

    /// Event names that currently have at least one listener.
    pub(crate) fn events(&self) -> Vec<K> {
        self.events
            .iter()
            .filter(|entry| !entry.value().is_empty())
            .map(|entry| entry.key().clone())
            .collect()
    }
}
