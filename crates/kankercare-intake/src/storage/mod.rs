//! Client-side storage: raw key/value backends and the obfuscating
//! session store built on them.

pub mod backend;
pub mod secure;

pub use backend::{FileStore, KeyValueStore, MemoryStore};
pub use secure::{AuthStorage, SecureStorage, UserData};
