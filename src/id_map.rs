use stable_vec::core::DefaultCore;
use stable_vec::StableVec;
use std::{
    marker::PhantomData,
    ops::{Index, IndexMut},
};

pub type IdType = u32;

pub trait Id: Copy {
    fn int(self) -> IdType;

    fn from_int(int: IdType) -> Self;
}

/// Arena that hands out stable keys and reuses the keys of removed values.
///
/// Freed keys are reused last-removed-first, and iteration is in key order,
/// so the traversal order only depends on the sequence of inserts and removes.
#[derive(Clone, Debug)]
pub(crate) struct IdMap<K, V> {
    map: StableVec<V>,
    free: Vec<IdType>,
    marker: PhantomData<K>,
}

impl<K, V> Default for IdMap<K, V> {
    fn default() -> Self {
        Self {
            map: StableVec::default(),
            free: vec![],
            marker: PhantomData,
        }
    }
}

impl<K: Id, V> IdMap<K, V> {
    /// Constructs a new id map.
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Gets the number of live values.
    pub(crate) fn len(&self) -> usize {
        debug_assert_eq!(
            self.map.num_elements(),
            self.map.next_push_index() - self.free.len()
        );
        self.map.num_elements()
    }

    /// Gets the number of slots that can be used without reallocating.
    #[cfg(test)]
    pub(crate) fn capacity(&self) -> usize {
        self.map.capacity()
    }

    /// Makes room for at least `additional` more values.
    pub(crate) fn reserve(&mut self, additional: usize) {
        self.map.reserve(additional);
    }

    /// Gets the value with a specific key, if it exists.
    pub(crate) fn get(&self, key: K) -> Option<&V> {
        self.map.get(key.int() as usize)
    }

    /// Gets the value with a specific key mutably, if it exists.
    pub(crate) fn get_mut(&mut self, key: K) -> Option<&mut V> {
        self.map.get_mut(key.int() as usize)
    }

    /// Inserts a value into the map and returns the key for that value.
    pub(crate) fn insert(&mut self, value: V) -> K {
        if let Some(key) = self.free.pop() {
            self.map.insert(key as usize, value);
            K::from_int(key)
        } else {
            let idx = self.map.push(value);
            K::from_int(idx as IdType)
        }
    }

    /// Removes the value with a specific key and returns that value, if it existed.
    pub(crate) fn remove(&mut self, key: K) -> Option<V> {
        if (key.int() as usize) < self.map.next_push_index() {
            let opt_value = self.map.remove(key.int() as usize);

            if opt_value.is_some() {
                self.free.push(key.int());
            }

            opt_value
        } else {
            None
        }
    }

    /// Removes every value. The allocation is kept.
    pub(crate) fn clear(&mut self) {
        self.map.clear();
        self.free.clear();
    }

    /// Iterates over (key, &value) pairs in key order.
    pub(crate) fn iter(&self) -> Iter<K, V> {
        Iter {
            iter: self.map.iter(),
            marker: PhantomData,
        }
    }

    /// Iterates over keys in key order.
    pub(crate) fn keys(&self) -> Keys<K, V> {
        Keys {
            iter: self.map.indices(),
            marker: PhantomData,
        }
    }

    /// Iterates over values in key order.
    #[cfg(test)]
    pub(crate) fn values(&self) -> Values<V> {
        Values {
            iter: self.map.iter(),
        }
    }
}

impl<K: Id, V> Index<K> for IdMap<K, V> {
    type Output = V;

    fn index(&self, index: K) -> &Self::Output {
        self.get(index)
            .unwrap_or_else(|| panic!("Index {} does not exist.", index.int()))
    }
}

impl<K: Id, V> IndexMut<K> for IdMap<K, V> {
    fn index_mut(&mut self, index: K) -> &mut Self::Output {
        self.get_mut(index)
            .unwrap_or_else(|| panic!("Index {} does not exist.", index.int()))
    }
}

pub struct Keys<'a, K, V> {
    iter: stable_vec::iter::Indices<'a, V, DefaultCore<V>>,
    marker: PhantomData<K>,
}

impl<'a, K: Id, V> Iterator for Keys<'a, K, V> {
    type Item = K;

    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next().map(|k| K::from_int(k as IdType))
    }
}

pub(crate) struct Values<'a, V> {
    iter: stable_vec::iter::Iter<'a, V, DefaultCore<V>>,
}

impl<'a, V> Iterator for Values<'a, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next().map(|(_, v)| v)
    }
}

pub struct Iter<'a, K, V> {
    iter: stable_vec::iter::Iter<'a, V, DefaultCore<V>>,
    marker: PhantomData<K>,
}

impl<'a, K: Id, V> Iterator for Iter<'a, K, V> {
    type Item = (K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next().map(|(k, v)| (K::from_int(k as IdType), v))
    }
}
