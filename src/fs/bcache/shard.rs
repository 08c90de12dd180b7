//! Shard do buffer cache: lista LRU + contador de slots livres.

use core::sync::atomic::{AtomicUsize, Ordering};

use crate::klib::list::IndexList;
use crate::sync::Spinlock;

/// Um shard. `free` conta os slots com `refcnt == 0` na lista e só muda
/// com `list` presa; sem o lock é só uma estimativa.
#[repr(C, align(64))]
pub struct CacheShard {
    pub list: Spinlock<IndexList>,
    free: AtomicUsize,
}

impl CacheShard {
    pub fn new(list: IndexList) -> Self {
        Self {
            list: Spinlock::named("bcache", list),
            free: AtomicUsize::new(0),
        }
    }

    #[inline]
    pub fn free_count(&self) -> usize {
        self.free.load(Ordering::Relaxed)
    }

    /// Com `list` presa
    #[inline]
    pub fn add_free(&self, n: usize) {
        self.free.fetch_add(n, Ordering::Relaxed);
    }

    /// Com `list` presa
    #[inline]
    pub fn sub_free(&self, n: usize) {
        self.free.fetch_sub(n, Ordering::Relaxed);
    }
}
