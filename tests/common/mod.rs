//! Shared helpers for the integration tests.

#![allow(dead_code)]

use pixel_pool::{BlockPool, PoolConfig};

/// Block capacity used by test pools: large enough for the test images, small
/// enough that oversized requests are cheap.
pub const TEST_BLOCK_CAPACITY: usize = 64 * 1024;

/// An isolated pool with small blocks.
pub fn test_pool(max_idle: usize) -> BlockPool {
    BlockPool::with_config(PoolConfig::new(TEST_BLOCK_CAPACITY, max_idle))
        .expect("valid test pool config")
}

/// Fills `buf` with a pattern derived from `seed` so tenants can be told apart.
pub fn stamp(buf: &mut [u8], seed: u8) {
    for (i, byte) in buf.iter_mut().enumerate() {
        *byte = seed.wrapping_add(i as u8);
    }
}

/// True if `buf` still holds the pattern written by [`stamp`].
pub fn has_stamp(buf: &[u8], seed: u8) -> bool {
    buf.iter()
        .enumerate()
        .all(|(i, &byte)| byte == seed.wrapping_add(i as u8))
}
