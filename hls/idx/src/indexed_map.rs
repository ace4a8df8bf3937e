use super::index_trait::IndexRef;
use std::{marker::PhantomData, ops};

/// A dense, append-only map from a typed index to its data. Keys are handed
/// out by [IndexedMap::push] and are never invalidated.
#[derive(Debug, Clone)]
pub struct IndexedMap<K, D>
where
    K: IndexRef,
{
    data: Vec<D>,
    phantom: PhantomData<K>,
}

impl<K, D> ops::IndexMut<K> for IndexedMap<K, D>
where
    K: IndexRef,
{
    fn index_mut(&mut self, index: K) -> &mut Self::Output {
        &mut self.data[index.index()]
    }
}

impl<K, D> ops::Index<K> for IndexedMap<K, D>
where
    K: IndexRef,
{
    type Output = D;

    fn index(&self, index: K) -> &Self::Output {
        &self.data[index.index()]
    }
}

impl<K, D> IndexedMap<K, D>
where
    K: IndexRef,
{
    pub fn new() -> Self {
        Self {
            data: Vec::new(),
            phantom: PhantomData,
        }
    }

    pub fn get(&self, index: K) -> Option<&D> {
        self.data.get(index.index())
    }

    pub fn contains(&self, index: K) -> bool {
        index.index() < self.data.len()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn push(&mut self, item: D) -> K {
        self.data.push(item);
        K::new(self.data.len() - 1)
    }

    /// The key the next call to [IndexedMap::push] will return.
    pub fn peek_next_idx(&self) -> K {
        K::new(self.data.len())
    }

    pub fn iter(&self) -> impl Iterator<Item = (K, &D)> {
        self.data.iter().enumerate().map(|(i, v)| (K::new(i), v))
    }
}

impl<K, D> Default for IndexedMap<K, D>
where
    K: IndexRef,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::IndexedMap;
    use crate::impl_index;
    use proptest::prelude::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    struct TestIdx(u32);
    impl_index!(TestIdx);

    #[test]
    fn push_hands_out_dense_keys() {
        let mut map: IndexedMap<TestIdx, &str> = IndexedMap::new();
        assert_eq!(map.peek_next_idx(), TestIdx(0));
        let a = map.push("a");
        let b = map.push("b");
        assert_eq!((a, b), (TestIdx(0), TestIdx(1)));
        assert_eq!(map[b], "b");
        assert!(map.get(TestIdx(2)).is_none());
        assert!(map.contains(b) && !map.contains(TestIdx(2)));
        assert_eq!(map.iter().map(|(k, _)| k).collect::<Vec<_>>(), vec![a, b]);
    }

    proptest! {
        #[test]
        fn keys_index_their_values(values in prop::collection::vec(any::<u64>(), 0..64)) {
            let mut map: IndexedMap<TestIdx, u64> = IndexedMap::new();
            let keys: Vec<_> = values.iter().map(|v| map.push(*v)).collect();
            prop_assert_eq!(map.len(), values.len());
            for (k, v) in keys.into_iter().zip(values.iter()) {
                prop_assert_eq!(map[k], *v);
            }
        }
    }
}
