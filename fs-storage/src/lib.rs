pub mod base_storage;
pub mod file_storage;

pub use base_storage::BaseStorage;
pub use file_storage::FileStorage;

/// File name of the cache document inside the user's cache directory
pub const CACHE_FILE: &str = "shelf-cache.json";
