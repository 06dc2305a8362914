//! Ordered key/value lists backing headers and query parameters.
//!
//! Keys are matched exactly (case-sensitive) and insertion order is
//! significant for output ordering. An entry may carry no value at all — a
//! tombstone — which signals "remove this key" during merge resolution
//! rather than an empty string.

/// One entry in a [`KvList`]. A `None` value is a tombstone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KvEntry {
    pub key: String,
    pub value: Option<String>,
}

/// Ordered association list with tombstone support.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KvList {
    entries: Vec<KvEntry>,
}

impl KvList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry, preserving insertion order. `None` appends a
    /// tombstone. Does not check for duplicate keys.
    pub fn push(&mut self, key: impl Into<String>, value: Option<&str>) {
        self.entries.push(KvEntry {
            key: key.into(),
            value: value.map(str::to_string),
        });
    }

    /// Replace the value of the first entry with `key` in place, or append a
    /// new entry if the key is absent. `None` leaves a tombstone.
    pub fn set(&mut self, key: &str, value: Option<&str>) {
        if let Some(entry) = self.entries.iter_mut().find(|entry| entry.key == key) {
            entry.value = value.map(str::to_string);
            return;
        }
        self.push(key, value);
    }

    /// Splice out the first entry with `key` entirely. Returns whether an
    /// entry was removed.
    pub fn remove(&mut self, key: &str) -> bool {
        match self.entries.iter().position(|entry| entry.key == key) {
            Some(index) => {
                self.entries.remove(index);
                true
            }
            None => false,
        }
    }

    /// Value of the first entry with `key`. Tombstoned and absent keys both
    /// yield `None`; use [`KvList::entry`] to distinguish them.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entry(key).flatten()
    }

    /// Lookup distinguishing a tombstone (`Some(None)`) from a missing key
    /// (`None`).
    pub fn entry(&self, key: &str) -> Option<Option<&str>> {
        self.entries
            .iter()
            .find(|entry| entry.key == key)
            .map(|entry| entry.value.as_deref())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|entry| entry.key == key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &KvEntry> {
        self.entries.iter()
    }
}

/// Raw merge of a default list and an override list.
///
/// For every key of `defaults` in order, the effective value is the
/// override's if present there, else the default's. Keys unique to
/// `overrides` follow, preserving their internal order. Tombstones survive
/// as `None` so transport-facing builders can render explicit unset forms.
///
/// Linear scans: O(|defaults| * |overrides|). Lists are header/param sized.
pub fn merge<'a>(defaults: &'a KvList, overrides: &'a KvList) -> Vec<(&'a str, Option<&'a str>)> {
    let mut resolved = Vec::with_capacity(defaults.len() + overrides.len());
    for entry in defaults.iter() {
        let value = match overrides.entry(&entry.key) {
            Some(override_value) => override_value,
            None => entry.value.as_deref(),
        };
        resolved.push((entry.key.as_str(), value));
    }
    for entry in overrides.iter() {
        if !defaults.contains_key(&entry.key) {
            resolved.push((entry.key.as_str(), entry.value.as_deref()));
        }
    }
    resolved
}

/// Logical merged list: tombstoned keys are omitted entirely (explicit
/// deletion), never emitted with an empty value.
pub fn merged(defaults: &KvList, overrides: &KvList) -> KvList {
    let mut list = KvList::new();
    for (key, value) in merge(defaults, overrides) {
        if let Some(value) = value {
            list.push(key, Some(value));
        }
    }
    list
}
