//! Insertion-ordered map that allows duplicate keys.

use std::borrow::Borrow;
use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::ops::Index;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A flat list of key/value pairs with a parallel list of key fingerprints.
///
/// Lookups scan the fingerprints and return the first entry whose key is
/// equal. Keys may repeat; [`get_all`](Self::get_all) returns every value for a
/// key in insertion order. Meant for the handful of entries a query string
/// carries, where a linear scan beats hashing into buckets.
#[derive(Clone)]
pub struct OrderedMultiMap<K, V> {
    entries: Vec<(K, V)>,
    fingerprints: Vec<u64>,
}

fn fingerprint<Q: Hash + ?Sized>(key: &Q) -> u64 {
    let mut hasher = DefaultHasher::new();
    key.hash(&mut hasher);
    hasher.finish()
}

impl<K, V> OrderedMultiMap<K, V> {
    /// Create an empty map.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            fingerprints: Vec::new(),
        }
    }

    /// Create an empty map with room for `capacity` entries.
    ///
    /// # Arguments
    ///
    /// * `capacity` - Number of entries to allocate for up front
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            fingerprints: Vec::with_capacity(capacity),
        }
    }

    /// Number of entries, counting every duplicate.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map has no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over the pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    /// Keys in insertion order, duplicates included.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.iter().map(|(k, _)| k)
    }

    /// Values in insertion order.
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.entries.iter().map(|(_, v)| v)
    }
}

impl<K: Hash + Eq, V> OrderedMultiMap<K, V> {
    fn position<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let hash = fingerprint(key);
        self.fingerprints
            .iter()
            .zip(&self.entries)
            .position(|(h, (k, _))| *h == hash && <K as Borrow<Q>>::borrow(k) == key)
    }

    /// Append a pair, keeping any existing entries for the same key.
    pub fn append(&mut self, key: K, value: V) {
        self.fingerprints.push(fingerprint(&key));
        self.entries.push((key, value));
    }

    /// Replace the value of the first entry for `key`, or append a new entry.
    ///
    /// Returns the replaced value.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        match self.position(&key) {
            Some(index) => Some(std::mem::replace(&mut self.entries[index].1, value)),
            None => {
                self.append(key, value);
                None
            }
        }
    }

    /// Value of the first entry for `key`.
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.position(key).map(|index| &self.entries[index].1)
    }

    /// Every value stored for `key`, in insertion order.
    pub fn get_all<Q>(&self, key: &Q) -> Vec<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let hash = fingerprint(key);
        self.fingerprints
            .iter()
            .zip(&self.entries)
            .filter(|(h, (k, _))| **h == hash && <K as Borrow<Q>>::borrow(k) == key)
            .map(|(_, (_, v))| v)
            .collect()
    }

    /// Check if at least one entry has `key`.
    ///
    /// # Arguments
    ///
    /// * `key` - The key to look for
    ///
    /// # Returns
    ///
    /// true if the key exists, false otherwise
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.position(key).is_some()
    }

    /// Remove the first entry for `key` and return its value. Later entries for
    /// the same key stay.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let index = self.position(key)?;
        self.fingerprints.remove(index);
        Some(self.entries.remove(index).1)
    }
}

impl<K, V> Default for OrderedMultiMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: PartialEq, V: PartialEq> PartialEq for OrderedMultiMap<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl<K: Eq, V: Eq> Eq for OrderedMultiMap<K, V> {}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for OrderedMultiMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.entries.iter()).finish()
    }
}

impl<K: Hash + Eq, V> FromIterator<(K, V)> for OrderedMultiMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<K: Hash + Eq, V> Extend<(K, V)> for OrderedMultiMap<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.append(key, value);
        }
    }
}

impl<K, V> IntoIterator for OrderedMultiMap<K, V> {
    type Item = (K, V);
    type IntoIter = std::vec::IntoIter<(K, V)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a, K, V> IntoIterator for &'a OrderedMultiMap<K, V> {
    type Item = &'a (K, V);
    type IntoIter = std::slice::Iter<'a, (K, V)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl<K, V, Q> Index<&Q> for OrderedMultiMap<K, V>
where
    K: Hash + Eq + Borrow<Q>,
    Q: Hash + Eq + ?Sized,
{
    type Output = V;

    /// # Panics
    ///
    /// Panics if `key` is not present.
    fn index(&self, key: &Q) -> &V {
        match self.get(key) {
            Some(value) => value,
            None => panic!("key not found in OrderedMultiMap"),
        }
    }
}

impl<K: Serialize, V: Serialize> Serialize for OrderedMultiMap<K, V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

struct MultiMapVisitor<K, V>(PhantomData<fn() -> (K, V)>);

impl<'de, K, V> Visitor<'de> for MultiMapVisitor<K, V>
where
    K: Deserialize<'de> + Hash + Eq,
    V: Deserialize<'de>,
{
    type Value = OrderedMultiMap<K, V>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut map = OrderedMultiMap::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((key, value)) = access.next_entry()? {
            map.append(key, value);
        }
        Ok(map)
    }
}

impl<'de, K, V> Deserialize<'de> for OrderedMultiMap<K, V>
where
    K: Deserialize<'de> + Hash + Eq,
    V: Deserialize<'de>,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(MultiMapVisitor(PhantomData))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck_macros::quickcheck;

    fn sample() -> OrderedMultiMap<String, String> {
        [("a", "1"), ("b", "2"), ("a", "3")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_get_returns_first() {
        let map = sample();
        assert_eq!(map.get("a"), Some(&"1".to_string()));
        assert_eq!(map.get("b"), Some(&"2".to_string()));
        assert_eq!(map.get("c"), None);
        assert_eq!(map["a"], "1");
    }

    #[test]
    fn test_get_all_in_order() {
        let map = sample();
        assert_eq!(map.get_all("a"), vec!["1", "3"]);
        assert!(map.get_all("missing").is_empty());
    }

    #[test]
    fn test_remove_first_only() {
        let mut map = sample();
        assert_eq!(map.remove("a"), Some("1".to_string()));
        assert_eq!(map.get("a"), Some(&"3".to_string()));
        assert_eq!(map.len(), 2);
        assert_eq!(map.remove("a"), Some("3".to_string()));
        assert_eq!(map.remove("a"), None);
        assert!(!map.contains_key("a"));
    }

    #[test]
    fn test_insert_updates_or_appends() {
        let mut map = sample();
        assert_eq!(map.insert("a".into(), "x".into()), Some("1".to_string()));
        assert_eq!(map.insert("c".into(), "4".into()), None);
        let pairs: Vec<_> = map.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
        assert_eq!(pairs, vec![("a", "x"), ("b", "2"), ("a", "3"), ("c", "4")]);
    }

    #[test]
    fn test_keys_and_values() {
        let map = sample();
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["a", "b", "a"]);
        assert_eq!(map.values().collect::<Vec<_>>(), vec!["1", "2", "3"]);
    }

    #[test]
    fn test_serde_keeps_order_and_duplicates() {
        let map = sample();
        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"{"a":"1","b":"2","a":"3"}"#);

        let back: OrderedMultiMap<String, String> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, map);
    }

    #[quickcheck]
    fn prop_first_and_all_values(pairs: Vec<(u8, u16)>) -> bool {
        let map: OrderedMultiMap<u8, u16> = pairs.iter().copied().collect();
        pairs.iter().all(|(key, _)| {
            let expected: Vec<&u16> = pairs.iter().filter(|(k, _)| k == key).map(|(_, v)| v).collect();
            map.get(key) == expected.first().copied() && map.get_all(key) == expected
        })
    }

    #[quickcheck]
    fn prop_remove_drops_one(pairs: Vec<(u8, u16)>, key: u8) -> bool {
        let mut map: OrderedMultiMap<u8, u16> = pairs.iter().copied().collect();
        let before = map.get_all(&key).len();
        let removed = map.remove(&key);
        let after = map.get_all(&key).len();
        match removed {
            Some(_) => after + 1 == before && map.len() + 1 == pairs.len(),
            None => before == 0 && map.len() == pairs.len(),
        }
    }
}
