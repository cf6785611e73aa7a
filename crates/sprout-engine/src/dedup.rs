// SPDX-FileCopyrightText: 2026 Sprout Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Duplicate-delivery suppression.
//!
//! Two independent bounded caches:
//! - [`IdRing`] remembers the most recent message ids (exact, count-bounded).
//!   It absorbs redelivery when the webhook and the poll runner both see the
//!   same stored message.
//! - [`ContentWindow`] remembers recently seen `(sender, content)` keys for a
//!   short time window. It absorbs human double-submits that arrive with
//!   different ids.
//!
//! Both are advisory. A miss only produces a duplicate reply.

use std::collections::{HashSet, VecDeque};
use std::time::Duration;

use chrono::{DateTime, Utc};
use sprout_config::model::DedupConfig;
use tracing::trace;

/// Count-bounded set of recently handled message ids, oldest evicted first.
#[derive(Debug)]
pub struct IdRing {
    capacity: usize,
    order: VecDeque<String>,
    seen: HashSet<String>,
}

impl IdRing {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            order: VecDeque::with_capacity(capacity),
            seen: HashSet::with_capacity(capacity),
        }
    }

    /// Records `id` and returns `true`, or returns `false` if it is already held.
    pub fn insert(&mut self, id: &str) -> bool {
        if self.seen.contains(id) {
            return false;
        }
        if self.order.len() == self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.seen.remove(&oldest);
            }
        }
        self.order.push_back(id.to_string());
        self.seen.insert(id.to_string());
        true
    }

    pub fn contains(&self, id: &str) -> bool {
        self.seen.contains(id)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Time- and count-bounded map of recently seen content keys.
///
/// Entries are kept in insertion order. A key is present at most once because
/// it is only recorded again after its previous entry has expired.
#[derive(Debug)]
pub struct ContentWindow {
    window: Duration,
    capacity: usize,
    entries: VecDeque<(String, DateTime<Utc>)>,
}

impl ContentWindow {
    pub fn new(window: Duration, capacity: usize) -> Self {
        Self {
            window,
            capacity: capacity.max(1),
            entries: VecDeque::new(),
        }
    }

    /// Purges expired entries, then records `key` at `now` unless it is still
    /// inside the window.
    pub fn insert(&mut self, key: &str, now: DateTime<Utc>) -> bool {
        self.purge(now);

        if self.entries.iter().any(|(k, _)| k == key) {
            return false;
        }
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back((key.to_string(), now));
        true
    }

    /// Drops every entry whose age has reached the window.
    pub fn purge(&mut self, now: DateTime<Utc>) {
        let window = self.window;
        let before = self.entries.len();
        self.entries.retain(|(_, seen)| age(now, *seen) < window);
        let purged = before - self.entries.len();
        if purged > 0 {
            trace!(purged, "expired content dedup entries");
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Age of an entry. A timestamp from the future counts as brand new.
fn age(now: DateTime<Utc>, seen: DateTime<Utc>) -> Duration {
    now.signed_duration_since(seen)
        .to_std()
        .unwrap_or(Duration::ZERO)
}

/// Builds the content key the pipeline uses: sender plus lowercased, trimmed text.
pub fn content_key(sender: &str, content: &str) -> String {
    format!("{sender}\u{1f}{}", content.trim().to_lowercase())
}

/// The pair of caches consulted before any side effect.
#[derive(Debug)]
pub struct Deduplicator {
    ids: IdRing,
    content: ContentWindow,
}

impl Deduplicator {
    pub fn new(id_capacity: usize, content_window: Duration, content_capacity: usize) -> Self {
        Self {
            ids: IdRing::new(id_capacity),
            content: ContentWindow::new(content_window, content_capacity),
        }
    }

    pub fn from_config(config: &DedupConfig) -> Self {
        Self::new(
            config.id_capacity,
            Duration::from_secs(config.content_window_secs),
            config.content_capacity,
        )
    }

    /// `false` if `id` was already handled; otherwise records it and returns `true`.
    pub fn should_process_by_id(&mut self, id: &str) -> bool {
        self.ids.insert(id)
    }

    /// `false` if `key` was recorded within the window; otherwise records it
    /// and returns `true`. Expired entries are purged on every call.
    pub fn should_process_by_content(&mut self, key: &str, now: DateTime<Utc>) -> bool {
        self.content.insert(key, now)
    }

    pub fn ids(&self) -> &IdRing {
        &self.ids
    }

    pub fn content(&self) -> &ContentWindow {
        &self.content
    }
}

impl Default for Deduplicator {
    fn default() -> Self {
        Self::from_config(&DedupConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;

    fn t(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_767_225_600 + secs, 0).unwrap()
    }

    #[test]
    fn id_seen_twice_is_suppressed() {
        let mut dedup = Deduplicator::default();
        assert!(dedup.should_process_by_id("m1"));
        assert!(!dedup.should_process_by_id("m1"));
        assert!(dedup.should_process_by_id("m2"));
    }

    #[test]
    fn oldest_id_forgotten_after_capacity() {
        let mut dedup = Deduplicator::default();
        for i in 0..1001 {
            assert!(dedup.should_process_by_id(&format!("id-{i}")));
        }
        assert_eq!(dedup.ids().len(), 1000);
        assert!(!dedup.ids().contains("id-0"));
        assert!(dedup.ids().contains("id-1"));
        assert!(dedup.ids().contains("id-1000"));
        assert!(dedup.should_process_by_id("id-0"));
        assert!(!dedup.should_process_by_id("id-1000"));
    }

    #[test]
    fn content_repeat_inside_window_is_suppressed() {
        let mut dedup = Deduplicator::default();
        assert!(dedup.should_process_by_content("hi", t(0)));
        assert!(!dedup.should_process_by_content("hi", t(5)));
        assert!(dedup.should_process_by_content("hi", t(11)));
    }

    #[test]
    fn suppressed_repeat_does_not_extend_window() {
        let mut dedup = Deduplicator::default();
        assert!(dedup.should_process_by_content("hi", t(0)));
        assert!(!dedup.should_process_by_content("hi", t(9)));
        assert!(dedup.should_process_by_content("hi", t(10)));
    }

    #[test]
    fn expired_entries_are_purged_on_every_call() {
        let mut window = ContentWindow::new(Duration::from_secs(10), 100);
        window.insert("a", t(0));
        window.insert("b", t(1));
        assert_eq!(window.len(), 2);
        window.insert("c", t(30));
        assert_eq!(window.len(), 1);
    }

    #[test]
    fn content_window_evicts_oldest_when_full() {
        let mut window = ContentWindow::new(Duration::from_secs(10), 2);
        assert!(window.insert("a", t(0)));
        assert!(window.insert("b", t(1)));
        assert!(window.insert("c", t(2)));
        assert_eq!(window.len(), 2);
        assert!(window.insert("a", t(3)));
        assert!(!window.insert("c", t(3)));
    }

    #[test]
    fn content_key_is_per_sender_and_normalized() {
        assert_eq!(content_key("+1", "  Hi There "), content_key("+1", "hi there"));
        assert_ne!(content_key("+1", "hi"), content_key("+2", "hi"));

        let mut dedup = Deduplicator::default();
        assert!(dedup.should_process_by_content(&content_key("+1", "hi"), t(0)));
        assert!(dedup.should_process_by_content(&content_key("+2", "hi"), t(1)));
        assert!(!dedup.should_process_by_content(&content_key("+1", "HI"), t(2)));
    }

    #[test]
    fn zero_capacity_is_clamped() {
        let mut ring = IdRing::new(0);
        assert!(ring.insert("a"));
        assert!(ring.insert("b"));
        assert_eq!(ring.len(), 1);
        assert!(!ring.contains("a"));
    }

    proptest! {
        #[test]
        fn ring_never_exceeds_capacity_and_keeps_newest(
            capacity in 1usize..50,
            ids in proptest::collection::vec(0u32..200, 0..300),
        ) {
            let mut ring = IdRing::new(capacity);
            for id in &ids {
                ring.insert(&id.to_string());
                prop_assert!(ring.len() <= capacity);
            }
            if let Some(last) = ids.last() {
                prop_assert!(ring.contains(&last.to_string()));
            }
        }

        #[test]
        fn content_window_never_exceeds_capacity(
            capacity in 1usize..20,
            keys in proptest::collection::vec((0u8..30, 0i64..5), 0..200),
        ) {
            let mut window = ContentWindow::new(Duration::from_secs(10), capacity);
            let mut now = 0;
            for (key, step) in keys {
                now += step;
                window.insert(&key.to_string(), t(now));
                prop_assert!(window.len() <= capacity);
            }
        }
    }
}
