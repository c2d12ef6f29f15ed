//! Integration tests for the collection store.
//!
//! These tests drive a real `CollectionStore` over a scratch directory and
//! check the on-disk layout, the write-then-publish protocol and the
//! not-found contracts end to end. Unit tests in each crate cover codecs,
//! retry, caching and key validation in isolation.

#[path = "../common/mod.rs"]
mod common;

mod bootstrap;
mod concurrency;
mod keys;
