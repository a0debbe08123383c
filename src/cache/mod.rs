// Cache module for local filesystem caching.
// Stores raw search responses so repeated queries skip the network.

pub mod paths;
pub mod store;

pub use paths::*;
pub use store::{
    CachePolicy, CachedData, DEFAULT_MAX_BYTES, DEFAULT_MAX_ENTRIES, DEFAULT_TTL, ResponseCache,
};
