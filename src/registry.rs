//! Poller registry.
//!
//! Ordered, fixed-capacity set of component handles that the event task
//! polls on every pass.  Insertion order is poll order.  Storage is a
//! `heapless::Vec`, so exhaustion is an explicit error instead of an
//! allocation failure.

use heapless::Vec;

/// Returned by [`PollerRegistry::insert`] when every slot is taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryFull;

/// Outcome of a successful insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Insert {
    Added,
    /// The item was registered already; the registry is unchanged.
    AlreadyPresent,
}

/// Ordered set with at most `N` members.
pub struct PollerRegistry<T, const N: usize> {
    items: Vec<T, N>,
}

impl<T: Copy + PartialEq, const N: usize> PollerRegistry<T, N> {
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Append `item` at the back.  Duplicates are ignored.
    pub fn insert(&mut self, item: T) -> Result<Insert, RegistryFull> {
        if self.contains(&item) {
            return Ok(Insert::AlreadyPresent);
        }
        self.items.push(item).map_err(|_| RegistryFull)?;
        Ok(Insert::Added)
    }

    /// Remove `item` keeping the order of the others.  Returns `false` if it
    /// was not registered.
    pub fn remove(&mut self, item: &T) -> bool {
        match self.items.iter().position(|i| i == item) {
            Some(pos) => {
                self.items.remove(pos);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, item: &T) -> bool {
        self.items.contains(item)
    }

    /// Members in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub const fn capacity(&self) -> usize {
        N
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

impl<T: Copy + PartialEq, const N: usize> Default for PollerRegistry<T, N> {
    fn default() -> Self {
        Self::new()
    }
}
