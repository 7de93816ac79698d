//! Packed storage for many small growable sequences.
//!
//! Purpose
//! - Keep every region outline in one contiguous buffer (bulk upload, cache
//!   locality) while each outline stays individually editable.
//!
//! Layout
//! - `store.rs`: `MultiVecStore<T>` with id-addressed spans (arena + index).
//! - `handle.rs`: `SharedStore<T>` and the RAII `SeqHandle<T>` that releases its
//!   span when dropped.

mod handle;
mod store;

pub use handle::{shared_store, SeqHandle, SharedStore};
pub use store::{MultiVecStore, SeqId};
