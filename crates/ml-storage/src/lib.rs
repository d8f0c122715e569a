//! Resource provider abstraction for lesson content.
//!
//! This crate provides a [`ResourceProvider`] trait: a byte-stream-by-name
//! capability over a closed, enumerable set of resource names. Content
//! indexing and localization build on it without knowing where the bytes
//! live.
//!
//! # Architecture
//!
//! The crate provides:
//! - [`ResourceProvider`] trait with `names()`, `open()` and `read()`
//! - [`FsResources`] mapping a directory tree to dotted resource names
//! - [`MockResources`] for testing, with call counters (behind `mock` feature flag)

mod fs;
#[cfg(feature = "mock")]
mod mock;
mod storage;

pub use fs::FsResources;
#[cfg(feature = "mock")]
pub use mock::MockResources;
pub use storage::{
    ResourceProvider, ResourceStream, StorageError, StorageErrorKind, validate_name,
};
