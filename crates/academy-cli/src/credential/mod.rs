//! Persisted ambient credential.
//!
//! The service authenticates with cookies. Between invocations the CLI keeps
//! them on disk, keyed to the API base they were issued by.

pub mod storage;

pub use storage::StoredCredential;
