//! Shard de páginas por CPU.
//!
//! A free list é singly-linked por índice: o elo de cada frame fica em
//! `next[idx]` no pool, e só é lido ou escrito com o lock do shard dono
//! da página preso.

use core::sync::atomic::{AtomicU32, AtomicUsize, Ordering};

use crate::sync::Spinlock;

/// Fim de lista
pub const NIL: u32 = u32::MAX;

/// Trecho contíguo (em ordem de lista) retirado de uma free list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chain {
    pub head: u32,
    pub tail: u32,
    pub len: usize,
}

/// Free list de um shard.
#[derive(Debug)]
pub struct FreeList {
    head: u32,
    len: usize,
}

impl FreeList {
    pub const fn new() -> Self {
        Self { head: NIL, len: 0 }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.head == NIL
    }

    pub fn push(&mut self, next: &[AtomicU32], idx: u32) {
        next[idx as usize].store(self.head, Ordering::Relaxed);
        self.head = idx;
        self.len += 1;
    }

    pub fn pop(&mut self, next: &[AtomicU32]) -> Option<u32> {
        if self.head == NIL {
            return None;
        }
        let idx = self.head;
        self.head = next[idx as usize].swap(NIL, Ordering::Relaxed);
        self.len -= 1;
        Some(idx)
    }

    /// Destaca os primeiros `n` elementos (limitado a `len`).
    pub fn split_front(&mut self, next: &[AtomicU32], n: usize) -> Option<Chain> {
        let n = n.min(self.len);
        if n == 0 {
            return None;
        }

        let head = self.head;
        let mut tail = head;
        for _ in 1..n {
            tail = next[tail as usize].load(Ordering::Relaxed);
        }

        self.head = next[tail as usize].swap(NIL, Ordering::Relaxed);
        self.len -= n;
        Some(Chain { head, tail, len: n })
    }

    /// Emenda uma cadeia no início da lista.
    pub fn splice_front(&mut self, next: &[AtomicU32], chain: Chain) {
        next[chain.tail as usize].store(self.head, Ordering::Relaxed);
        self.head = chain.head;
        self.len += chain.len;
    }
}

impl Default for FreeList {
    fn default() -> Self {
        Self::new()
    }
}

/// Shard de uma CPU: lista + contador espelhado para varredura sem lock.
///
/// `free` só muda com `list` presa; leitores sem lock veem um valor
/// possivelmente atrasado, o que basta para escolher o doador.
#[repr(C, align(64))]
pub struct PageShard {
    pub list: Spinlock<FreeList>,
    free: AtomicUsize,
}

impl PageShard {
    pub const fn new() -> Self {
        Self {
            list: Spinlock::named("kmem", FreeList::new()),
            free: AtomicUsize::new(0),
        }
    }

    /// Leitura sem lock do número de páginas livres
    #[inline]
    pub fn free_count(&self) -> usize {
        self.free.load(Ordering::Relaxed)
    }

    /// Republica o contador. Só com `list` presa.
    #[inline]
    pub fn publish(&self, list: &FreeList) {
        self.free.store(list.len(), Ordering::Relaxed);
    }
}

impl Default for PageShard {
    fn default() -> Self {
        Self::new()
    }
}
