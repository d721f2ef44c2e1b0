use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Set of process-local ids, iterated in ascending order.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct IdSet(BTreeSet<u64>);

impl IdSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, id: u64) {
        self.0.insert(id);
    }

    pub fn union(&mut self, other: &IdSet) {
        self.0.extend(other.0.iter().copied());
    }

    pub fn contains(&self, id: u64) -> bool {
        self.0.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = u64> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<u64> for IdSet {
    fn from_iter<I: IntoIterator<Item = u64>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Map from an id to a set of ids; absent keys behave like empty sets.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct DefaultIdSetMap(BTreeMap<u64, IdSet>);

impl DefaultIdSetMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: u64) -> Option<&IdSet> {
        self.0.get(&key)
    }

    pub fn set_add(&mut self, key: u64, id: u64) {
        self.0.entry(key).or_default().add(id);
    }

    pub fn set_union(&mut self, key: u64, ids: &IdSet) {
        self.0.entry(key).or_default().union(ids);
    }

    pub fn set_len(&self, key: u64) -> usize {
        self.0.get(&key).map_or(0, IdSet::len)
    }

    /// Members of the set stored under `key`.
    pub fn set_iter(&self, key: u64) -> impl Iterator<Item = u64> + '_ {
        self.0.get(&key).into_iter().flat_map(IdSet::iter)
    }

    pub fn iter(&self) -> impl Iterator<Item = (u64, &IdSet)> + '_ {
        self.0.iter().map(|(k, v)| (*k, v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_read_as_empty() {
        let map = DefaultIdSetMap::new();
        assert_eq!(map.set_len(7), 0);
        assert_eq!(map.set_iter(7).count(), 0);
        assert!(map.get(7).is_none());
    }

    #[test]
    fn union_merges_without_duplicates() {
        let mut map = DefaultIdSetMap::new();
        map.set_add(1, 10);
        map.set_union(1, &[10, 11, 12].into_iter().collect());
        assert_eq!(map.set_iter(1).collect::<Vec<_>>(), vec![10, 11, 12]);
        assert_eq!(map.len(), 1);
    }
}
