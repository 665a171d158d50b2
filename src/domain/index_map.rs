// ============================================================
// Layer 3 — IndexBijection
// ============================================================
// An ordered key ↔ index bijection. Both directions are kept in
// step on every insert:
//
//   forward: HashMap<K, usize>   key   → index
//   inverse: Vec<K>              index → key
//
// Indices are handed out contiguously from 0 in insertion order,
// so `(0..len)` is always exactly the set of valid indices.
// Used for the word → id table, the char → id table and as an
// insertion-ordered set while collecting the corpus vocabulary.
//
// Serializes as a JSON object { key: index }.
//
// Reference: Rust Book §8 (Hash Maps)

use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::marker::PhantomData;

use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::{Deserialize, Serialize, Serializer};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexBijection<K: Eq + Hash> {
    forward: HashMap<K, usize>,
    inverse: Vec<K>,
}

impl<K: Eq + Hash> Default for IndexBijection<K> {
    fn default() -> Self {
        Self { forward: HashMap::new(), inverse: Vec::new() }
    }
}

impl<K: Eq + Hash + Clone> IndexBijection<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `key` if absent and return its index either way.
    pub fn insert(&mut self, key: K) -> usize {
        if let Some(&idx) = self.forward.get(&key) {
            return idx;
        }
        let idx = self.inverse.len();
        self.forward.insert(key.clone(), idx);
        self.inverse.push(key);
        idx
    }

    pub fn index_of<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.forward.get(key).copied()
    }

    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.forward.contains_key(key)
    }

    #[cfg(test)]
    pub fn key(&self, idx: usize) -> Option<&K> {
        self.inverse.get(idx)
    }

    pub fn len(&self) -> usize {
        self.inverse.len()
    }

    /// Keys in index order.
    pub fn keys(&self) -> std::slice::Iter<'_, K> {
        self.inverse.iter()
    }
}

impl<K: Eq + Hash + Clone> FromIterator<K> for IndexBijection<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut map = Self::new();
        for key in iter {
            map.insert(key);
        }
        map
    }
}

// ─── serde ────────────────────────────────────────────────────────────────────
impl<K: Eq + Hash + Serialize> Serialize for IndexBijection<K> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.inverse.iter().enumerate().map(|(idx, k)| (k, idx)))
    }
}

impl<'de, K> Deserialize<'de> for IndexBijection<K>
where
    K: Eq + Hash + Clone + Deserialize<'de>,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(BijectionVisitor(PhantomData))
    }
}

struct BijectionVisitor<K>(PhantomData<K>);

impl<'de, K> Visitor<'de> for BijectionVisitor<K>
where
    K: Eq + Hash + Clone + Deserialize<'de>,
{
    type Value = IndexBijection<K>;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a map of keys to contiguous indices")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut pairs: Vec<(K, usize)> = Vec::new();
        while let Some((k, idx)) = access.next_entry::<K, usize>()? {
            pairs.push((k, idx));
        }
        pairs.sort_by_key(|(_, idx)| *idx);

        let mut map = IndexBijection::new();
        for (k, idx) in pairs {
            if map.insert(k) != idx {
                return Err(de::Error::custom(format!(
                    "indices are not a contiguous range from 0 (found {idx})"
                )));
            }
        }
        Ok(map)
    }
}
