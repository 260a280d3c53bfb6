//! Reconstituting pins from stored entries.

use crate::error::{Error, Result};
use crate::pins::{KeyValueStore, PinRecord};
use std::vec;
use tracing::warn;

/// Lazy iterator over the pins in a key snapshot.
///
/// Yields one item per key. Entries removed since the snapshot are passed over;
/// entries that cannot be read come back as [`Error::MalformedPin`].
pub struct PinIter<'a, S> {
    store: &'a S,
    keys: vec::IntoIter<String>,
}

impl<'a, S: KeyValueStore> PinIter<'a, S> {
    pub(crate) fn new(store: &'a S, keys: Vec<String>) -> Self {
        Self {
            store,
            keys: keys.into_iter(),
        }
    }
}

impl<S: KeyValueStore> Iterator for PinIter<'_, S> {
    type Item = Result<PinRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let key = self.keys.next()?;
            match self.store.get(&key) {
                Ok(Some(raw)) => return Some(PinRecord::decode(&key, &raw)),
                Ok(None) => {}
                Err(Error::StoreIo { path, source }) => {
                    return Some(Err(Error::MalformedPin {
                        key,
                        reason: format!("unreadable entry {}: {source}", path.display()),
                    }));
                }
                Err(e) => return Some(Err(e)),
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.keys.len()))
    }
}

/// Readable pins plus the number of entries that could not be parsed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PinListing {
    /// Pins in key order.
    pub pins: Vec<PinRecord>,
    /// Malformed entries that were skipped.
    pub skipped: usize,
}

impl PinListing {
    /// Drain `items`, keeping valid pins and counting malformed ones.
    ///
    /// Storage errors other than malformed entries abort the listing.
    pub fn collect(items: impl IntoIterator<Item = Result<PinRecord>>) -> Result<Self> {
        let mut listing = Self::default();
        for item in items {
            match item {
                Ok(pin) => listing.pins.push(pin),
                Err(Error::MalformedPin { key, reason }) => {
                    warn!("Skipping malformed pin '{key}': {reason}");
                    listing.skipped += 1;
                }
                Err(e) => return Err(e),
            }
        }
        Ok(listing)
    }
}
