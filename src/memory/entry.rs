// Entry stored by the in-memory provider.

use bytes::Bytes;

/// Stored value plus its expiry countdown.
///
/// Entries are permanent until a TTL is applied; `remaining` only matters
/// while `temporary` is set.
#[derive(Debug, Clone)]
pub(crate) struct Entry {
    value: Bytes,
    remaining: i64,
    temporary: bool,
}

impl Entry {
    pub(crate) fn permanent(value: Bytes) -> Self {
        Self {
            value,
            remaining: 0,
            temporary: false,
        }
    }

    pub(crate) fn value(&self) -> &Bytes {
        &self.value
    }

    #[cfg(test)]
    pub(crate) fn is_temporary(&self) -> bool {
        self.temporary
    }

    #[cfg(test)]
    pub(crate) fn remaining(&self) -> i64 {
        self.remaining
    }

    /// Starts a countdown of `ticks` clock ticks.
    pub(crate) fn expire_in(&mut self, ticks: u64) {
        self.temporary = true;
        self.remaining = i64::try_from(ticks).unwrap_or(i64::MAX);
    }

    /// Advances the countdown by one tick. Returns true once the entry is due.
    pub(crate) fn tick(&mut self) -> bool {
        if !self.temporary {
            return false;
        }
        self.remaining = self.remaining.saturating_sub(1);
        self.remaining <= 0
    }
}
