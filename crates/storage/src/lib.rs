//! Storage abstraction and implementations for Pacer.
//!
//! This crate provides a trait-based storage interface with a JSON-file
//! reference implementation, plus the file-backed settings store.

#![warn(missing_docs)]

pub mod trait_;
pub mod json_storage;
pub mod settings_store;

pub use trait_::{Storage, StorageError, Result};
pub use json_storage::JsonStorage;
pub use settings_store::{SettingsStore, ReloadPolicy};
