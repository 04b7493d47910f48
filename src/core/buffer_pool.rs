//! # Buffer Pool Module
//!
//! Reusable storage for large pixel buffers. Image operations such as resizing
//! need a fresh working buffer per call; allocating and freeing tens of
//! megabytes each time dominates the hot path, so blocks are recycled instead.
//!
//! ## Overview
//!
//! - Every pooled block has the same fixed capacity (64 MiB by default).
//! - Requests up to that capacity are served from an idle block, or a new
//!   block when none is idle.
//! - Larger requests get a dedicated, exactly-sized allocation that is freed on
//!   release rather than pooled.
//! - A [`PixelBuffer`] is its own release token: dropping it, or calling
//!   [`PixelBuffer::release`], hands the block back. Release consumes the
//!   buffer, so it cannot happen twice and the buffer cannot be used afterwards.
//!
//! ```text
//! ┌─────────────────┐ acquire ┌─────────────────┐ release ┌─────────────────┐
//! │     Caller      │◀────────│   Idle blocks   │◀────────│   PixelBuffer   │
//! │                 │         │  ┌───────────┐  │         │   (dropped)     │
//! └─────────────────┘         │  │ Block 1   │  │         └─────────────────┘
//!                             │  │ Block N   │  │
//!                             │  └───────────┘  │
//!                             └─────────────────┘
//! ```
//!
//! ## Contents
//!
//! Buffers are not zeroed between tenants. A reused block may hold bytes
//! written by a previous caller; callers that need zeroed memory must clear it.
//!
//! ## Example
//!
//! ```rust
//! use pixel_pool::config::PoolConfig;
//! use pixel_pool::core::buffer_pool::BlockPool;
//!
//! let pool = BlockPool::with_config(PoolConfig::new(4096, 2))?;
//!
//! let buffer = pool.acquire(1000);
//! assert_eq!(buffer.len(), 1000);
//! assert!(buffer.is_pooled());
//! buffer.release();
//!
//! let stats = pool.stats();
//! assert_eq!(stats.idle, 1);
//! assert_eq!(stats.misses, 1);
//! # Ok::<(), pixel_pool::PixelBufferError>(())
//! ```

use std::fmt;
use std::mem;
use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use once_cell::sync::Lazy;
use tracing::{debug, trace, warn};

use crate::config::PoolConfig;
use crate::error::PixelResult;

static GLOBAL_POOL: Lazy<BlockPool> = Lazy::new(|| {
    let config = PoolConfig::from_env().unwrap_or_else(|e| {
        warn!(error = %e, "invalid pool configuration in environment, using defaults");
        PoolConfig::default()
    });
    BlockPool::from_valid_config(config)
});

/// Snapshot of pool utilization and lifetime counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Blocks currently idle in the pool
    pub idle: usize,
    /// Maximum number of idle blocks retained
    pub max_idle: usize,
    /// Capacity of each pooled block in bytes
    pub block_capacity: usize,
    /// Acquisitions served by an idle block
    pub hits: u64,
    /// Acquisitions that had to allocate a new block
    pub misses: u64,
    /// Acquisitions above `block_capacity`, served outside the pool
    pub oversized: u64,
    /// Pooled buffers handed back
    pub released: u64,
    /// Released blocks freed because the idle set was full
    pub discarded: u64,
}

struct Shared {
    idle: Mutex<Vec<Vec<u8>>>,
    config: PoolConfig,
    hits: AtomicU64,
    misses: AtomicU64,
    oversized: AtomicU64,
    released: AtomicU64,
    discarded: AtomicU64,
}

impl Shared {
    // No caller code runs under this lock, so a poisoned guard still holds a
    // consistent idle set.
    fn idle(&self) -> MutexGuard<'_, Vec<Vec<u8>>> {
        self.idle.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn put(&self, block: Vec<u8>) {
        self.released.fetch_add(1, Ordering::Relaxed);
        let mut idle = self.idle();
        if idle.len() < self.config.max_idle {
            idle.push(block);
            return;
        }
        drop(idle);
        self.discarded.fetch_add(1, Ordering::Relaxed);
        trace!(
            max_idle = self.config.max_idle,
            "idle set full, freeing released block"
        );
    }
}

/// Thread-safe pool of fixed-capacity byte blocks.
///
/// `BlockPool` is a cheap handle: clones share the same idle set. Buffers keep
/// only a weak reference to it, so dropping every handle frees idle blocks
/// immediately and outstanding buffers are freed on release.
///
/// # Examples
///
/// ```rust
/// use pixel_pool::core::buffer_pool::BlockPool;
///
/// // Process-wide pool, sized from the environment or defaults.
/// let pool = BlockPool::global();
/// let buffer = pool.acquire(1920 * 1080 * 4);
/// assert_eq!(buffer.len(), 1920 * 1080 * 4);
/// ```
#[derive(Clone)]
pub struct BlockPool {
    shared: Arc<Shared>,
}

impl BlockPool {
    /// Creates an isolated pool after validating `config`.
    pub fn with_config(config: PoolConfig) -> PixelResult<Self> {
        config.validate()?;
        Ok(Self::from_valid_config(config))
    }

    fn from_valid_config(config: PoolConfig) -> Self {
        debug!(
            block_capacity = config.block_capacity,
            max_idle = config.max_idle,
            "creating block pool"
        );
        Self {
            shared: Arc::new(Shared {
                idle: Mutex::new(Vec::with_capacity(config.max_idle)),
                config,
                hits: AtomicU64::new(0),
                misses: AtomicU64::new(0),
                oversized: AtomicU64::new(0),
                released: AtomicU64::new(0),
                discarded: AtomicU64::new(0),
            }),
        }
    }

    /// The process-wide pool, created on first use.
    ///
    /// Sized by [`PoolConfig::from_env`], falling back to defaults if the
    /// environment holds invalid values.
    pub fn global() -> &'static BlockPool {
        &GLOBAL_POOL
    }

    /// The configuration this pool was built with.
    pub fn config(&self) -> PoolConfig {
        self.shared.config
    }

    /// Returns a buffer of exactly `size` bytes.
    ///
    /// Requests up to the block capacity reuse an idle block when one is
    /// available. Contents are unspecified: reused blocks keep whatever their
    /// previous tenant wrote. Larger requests get a dedicated zeroed
    /// allocation that bypasses the pool entirely.
    pub fn acquire(&self, size: usize) -> PixelBuffer {
        let capacity = self.shared.config.block_capacity;
        if size > capacity {
            self.shared.oversized.fetch_add(1, Ordering::Relaxed);
            debug!(size, capacity, "oversized pixel buffer bypasses pool");
            return PixelBuffer {
                block: vec![0u8; size],
                len: size,
                home: None,
            };
        }

        let reused = self.shared.idle().pop();
        let mut block = match reused {
            Some(block) => {
                self.shared.hits.fetch_add(1, Ordering::Relaxed);
                trace!(size, "reusing idle block");
                block
            }
            None => {
                self.shared.misses.fetch_add(1, Ordering::Relaxed);
                debug!(size, capacity, "pool miss, allocating block");
                Vec::with_capacity(capacity)
            }
        };

        // The block's initialized prefix only ever grows, so a reused block
        // is only written when this tenant asks for more than any before it.
        if block.len() < size {
            block.resize(size, 0);
        }

        PixelBuffer {
            block,
            len: size,
            home: Some(Arc::downgrade(&self.shared)),
        }
    }

    /// Frees every idle block and returns how many were freed.
    ///
    /// Outstanding buffers are unaffected and still return to the pool when
    /// released.
    pub fn trim(&self) -> usize {
        let drained = mem::take(&mut *self.shared.idle());
        let freed = drained.len();
        if freed > 0 {
            debug!(freed, "trimmed idle blocks");
        }
        freed
    }

    /// Returns current pool statistics.
    pub fn stats(&self) -> PoolStats {
        let shared = &self.shared;
        PoolStats {
            idle: shared.idle().len(),
            max_idle: shared.config.max_idle,
            block_capacity: shared.config.block_capacity,
            hits: shared.hits.load(Ordering::Relaxed),
            misses: shared.misses.load(Ordering::Relaxed),
            oversized: shared.oversized.load(Ordering::Relaxed),
            released: shared.released.load(Ordering::Relaxed),
            discarded: shared.discarded.load(Ordering::Relaxed),
        }
    }
}

impl Default for BlockPool {
    fn default() -> Self {
        Self::from_valid_config(PoolConfig::default())
    }
}

impl fmt::Debug for BlockPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlockPool")
            .field("config", &self.shared.config)
            .field("stats", &self.stats())
            .finish()
    }
}

/// Exclusively owned pixel storage of an exact length.
///
/// Dereferences to `[u8]`. Dropping the buffer returns pooled storage to its
/// pool; [`release`](Self::release) does the same explicitly.
pub struct PixelBuffer {
    block: Vec<u8>,
    len: usize,
    home: Option<Weak<Shared>>,
}

impl PixelBuffer {
    /// True if the storage came from a pool and will be returned to it.
    pub fn is_pooled(&self) -> bool {
        self.home.is_some()
    }

    /// Hands the storage back to its pool. A no-op for oversized buffers.
    pub fn release(self) {
        drop(self);
    }
}

impl Deref for PixelBuffer {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.block[..self.len]
    }
}

impl DerefMut for PixelBuffer {
    fn deref_mut(&mut self) -> &mut [u8] {
        &mut self.block[..self.len]
    }
}

impl AsRef<[u8]> for PixelBuffer {
    fn as_ref(&self) -> &[u8] {
        self
    }
}

impl AsMut<[u8]> for PixelBuffer {
    fn as_mut(&mut self) -> &mut [u8] {
        self
    }
}

impl Drop for PixelBuffer {
    fn drop(&mut self) {
        let Some(home) = self.home.take() else {
            return;
        };
        if let Some(shared) = home.upgrade() {
            shared.put(mem::take(&mut self.block));
        }
    }
}

impl fmt::Debug for PixelBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PixelBuffer")
            .field("len", &self.len)
            .field("pooled", &self.is_pooled())
            .finish()
    }
}
