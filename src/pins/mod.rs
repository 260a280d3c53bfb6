//! Geo-pin storage.
//!
//! A pin is a flower label saved together with the location it was found at.
//! Pins live in a string key-value namespace; see [`KeyValueStore`].

mod listing;
mod location;
mod record;
mod store;

pub use listing::{PinIter, PinListing};
pub use location::{Coordinates, FixedLocation, LocationProvider};
pub use record::PinRecord;
pub use store::{FileStore, KeyValueStore, MemoryStore, PinStore, next_pin_key};
