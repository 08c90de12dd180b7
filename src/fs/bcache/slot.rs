//! Slot do buffer cache.
//!
//! Identidade (`dev`, `blockno`), `refcnt` e `shard` só mudam com o lock do
//! shard onde o slot está. O conteúdo mora num [`SleepLock`] próprio, que
//! pode ficar preso durante I/O.
//!
//! Com `refcnt == 0` ninguém segura nem espera o lock de conteúdo.

use core::sync::atomic::{AtomicBool, AtomicU32, AtomicUsize, Ordering};

use super::config::{BLOCK_SIZE, NO_DEV};
use crate::sync::SleepLock;

pub struct Slot {
    dev: AtomicU32,
    blockno: AtomicU32,
    refcnt: AtomicU32,
    /// Conteúdo reflete o disco?
    valid: AtomicBool,
    /// Shard onde o slot está ligado
    shard: AtomicUsize,
    pub content: SleepLock<[u8; BLOCK_SIZE]>,
}

impl Slot {
    pub fn new(shard: usize) -> Self {
        Self {
            dev: AtomicU32::new(NO_DEV),
            blockno: AtomicU32::new(0),
            refcnt: AtomicU32::new(0),
            valid: AtomicBool::new(false),
            shard: AtomicUsize::new(shard),
            content: SleepLock::new("buffer", [0; BLOCK_SIZE]),
        }
    }

    #[inline]
    pub fn dev(&self) -> u32 {
        self.dev.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn blockno(&self) -> u32 {
        self.blockno.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn refcnt(&self) -> u32 {
        self.refcnt.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn shard(&self) -> usize {
        self.shard.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn is(&self, dev: u32, blockno: u32) -> bool {
        self.dev() == dev && self.blockno() == blockno
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        self.valid.load(Ordering::Acquire)
    }

    /// Com o lock de conteúdo preso.
    #[inline]
    pub fn set_valid(&self, valid: bool) {
        self.valid.store(valid, Ordering::Release);
    }

    /// Novo dono: assume a identidade, inválido, `refcnt = 1`.
    pub fn claim(&self, dev: u32, blockno: u32) {
        self.dev.store(dev, Ordering::Relaxed);
        self.blockno.store(blockno, Ordering::Relaxed);
        self.valid.store(false, Ordering::Release);
        self.refcnt.store(1, Ordering::Relaxed);
    }

    /// Perde a identidade ao mudar de shard (`refcnt == 0`).
    pub fn blank(&self, shard: usize) {
        self.dev.store(NO_DEV, Ordering::Relaxed);
        self.blockno.store(0, Ordering::Relaxed);
        self.valid.store(false, Ordering::Release);
        self.shard.store(shard, Ordering::Relaxed);
    }

    /// Retorna o valor anterior
    #[inline]
    pub fn inc_ref(&self) -> u32 {
        let r = self.refcnt();
        self.refcnt.store(r + 1, Ordering::Relaxed);
        r
    }

    /// Retorna o valor novo
    #[inline]
    pub fn dec_ref(&self) -> u32 {
        let r = self.refcnt() - 1;
        self.refcnt.store(r, Ordering::Relaxed);
        r
    }
}
