//! Cache Module
//!
//! Expiring key-value cache over a document collection, with lazy
//! client-side expiration.

mod clock;
mod entry;
mod store;
mod value;


// Re-export public types
pub use clock::{Clock, ManualClock, SystemClock};
pub use entry::CacheEntry;
pub use store::{CacheStore, FOREVER_SECONDS};
pub use value::{decode, encode};
