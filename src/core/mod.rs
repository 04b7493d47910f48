//! # Core Infrastructure Module
//!
//! The two halves of pixel buffer allocation: the block pool that recycles
//! storage, and the geometry that decides how much storage a request needs.

pub mod buffer_pool;
pub mod geometry;
