//! Insertion-ordered recency tracking, shared by the translation cache and
//! the LRU replacement policy.

use std::collections::HashMap;
use std::hash::Hash;

struct Link<K, V> {
    value: V,
    newer: Option<K>,
    older: Option<K>,
}

/// A map whose keys are threaded on a doubly-linked recency list.
///
/// `touch` moves a key to the newest end and `pop_oldest` evicts from the
/// oldest end, both O(1); the list is threaded through the hash entries
/// themselves, so removal never has to repair a separate queue.
pub(crate) struct RecencyMap<K, V> {
    links: HashMap<K, Link<K, V>>,
    newest: Option<K>,
    oldest: Option<K>,
}

impl<K: Copy + Eq + Hash, V> RecencyMap<K, V> {
    pub fn new() -> Self {
        RecencyMap {
            links: HashMap::new(),
            newest: None,
            oldest: None,
        }
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    pub fn contains(&self, key: K) -> bool {
        self.links.contains_key(&key)
    }

    pub fn get(&self, key: K) -> Option<&V> {
        self.links.get(&key).map(|link| &link.value)
    }

    /// Move `key` to the newest end. Returns false if the key is absent.
    pub fn touch(&mut self, key: K) -> bool {
        if !self.links.contains_key(&key) {
            return false;
        }
        self.unlink(key);
        self.link_newest(key);
        true
    }

    /// Insert `key` at the newest end, overwriting and promoting any
    /// existing entry.
    pub fn insert(&mut self, key: K, value: V) {
        if let Some(link) = self.links.get_mut(&key) {
            link.value = value;
            self.touch(key);
            return;
        }
        self.links.insert(
            key,
            Link {
                value,
                newer: None,
                older: None,
            },
        );
        self.link_newest(key);
    }

    /// Remove the entry at the oldest end.
    pub fn pop_oldest(&mut self) -> Option<(K, V)> {
        let key = self.oldest?;
        let value = self.remove(key)?;
        Some((key, value))
    }

    /// Remove `key`, returning its value.
    pub fn remove(&mut self, key: K) -> Option<V> {
        if !self.links.contains_key(&key) {
            return None;
        }
        self.unlink(key);
        self.links.remove(&key).map(|link| link.value)
    }

    pub fn clear(&mut self) {
        self.links.clear();
        self.newest = None;
        self.oldest = None;
    }

    /// Iterate entries from oldest to newest.
    pub fn iter_oldest_first(&self) -> OldestFirst<'_, K, V> {
        OldestFirst {
            map: self,
            cursor: self.oldest,
        }
    }

    fn unlink(&mut self, key: K) {
        let (newer, older) = match self.links.get(&key) {
            Some(link) => (link.newer, link.older),
            None => return,
        };
        match newer {
            Some(newer_key) => {
                if let Some(link) = self.links.get_mut(&newer_key) {
                    link.older = older;
                }
            }
            None => self.newest = older,
        }
        match older {
            Some(older_key) => {
                if let Some(link) = self.links.get_mut(&older_key) {
                    link.newer = newer;
                }
            }
            None => self.oldest = newer,
        }
    }

    fn link_newest(&mut self, key: K) {
        let previous_newest = self.newest;
        if let Some(link) = self.links.get_mut(&key) {
            link.newer = None;
            link.older = previous_newest;
        }
        if let Some(previous_key) = previous_newest {
            if let Some(link) = self.links.get_mut(&previous_key) {
                link.newer = Some(key);
            }
        }
        self.newest = Some(key);
        if self.oldest.is_none() {
            self.oldest = Some(key);
        }
    }
}

pub(crate) struct OldestFirst<'a, K, V> {
    map: &'a RecencyMap<K, V>,
    cursor: Option<K>,
}

impl<'a, K: Copy + Eq + Hash, V> Iterator for OldestFirst<'a, K, V> {
    type Item = (K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let key = self.cursor?;
        let link = self.map.links.get(&key)?;
        self.cursor = link.newer;
        Some((key, &link.value))
    }
}
