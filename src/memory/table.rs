// Key to entry table owned by one in-memory provider.

use std::collections::HashMap;

use bytes::Bytes;

use super::entry::Entry;

/// Entry table. Not synchronized itself; the provider and its clock share it
/// behind one mutex.
#[derive(Debug, Default)]
pub(crate) struct Table {
    entries: HashMap<String, Entry>,
}

impl Table {
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn get(&self, key: &str) -> Option<Bytes> {
        self.entries.get(key).map(|entry| entry.value().clone())
    }

    /// Overwrites the entry under `key`; the new entry is permanent.
    pub(crate) fn set(&mut self, key: &str, value: Bytes) {
        self.entries.insert(key.to_owned(), Entry::permanent(value));
    }

    /// Returns false when the key is absent.
    pub(crate) fn expire_in(&mut self, key: &str, ticks: u64) -> bool {
        match self.entries.get_mut(key) {
            Some(entry) => {
                entry.expire_in(ticks);
                true
            }
            None => false,
        }
    }

    /// Returns false when the key is absent.
    pub(crate) fn remove(&mut self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    /// Advances every countdown by one tick and evicts due entries through
    /// [`Table::remove`]. Returns the evicted keys.
    pub(crate) fn tick(&mut self) -> Vec<String> {
        let due: Vec<String> = self
            .entries
            .iter_mut()
            .filter_map(|(key, entry)| entry.tick().then(|| key.clone()))
            .collect();
        for key in &due {
            self.remove(key);
        }
        due
    }

    #[cfg(test)]
    pub(crate) fn entry(&self, key: &str) -> Option<&Entry> {
        self.entries.get(key)
    }
}
