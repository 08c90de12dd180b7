//! Forge Shard.
//!
//! Os dois pools particionados do kernel Forge:
//!
//! - [`mm::pmm`]: alocador de páginas físicas com uma free list por CPU e
//!   roubo (work-stealing) entre CPUs quando a lista local esvazia.
//! - [`fs::bcache`]: buffer cache de blocos de disco, particionado por hash
//!   (`blockno % shards`), LRU por shard e roubo entre shards.
//!
//! Ambos seguem o mesmo padrão: N shards com lock próprio, rebalanceados
//! por roubo quando um shard fica sem recursos livres.

#![cfg_attr(not(test), no_std)]

extern crate alloc;

// --- Infraestrutura ---
pub mod hal; // CPU + scheduler (seams instaláveis)
pub mod kcore; // Logging e caminho fatal
pub mod klib; // Listas indexadas, framework de testes
pub mod sync; // Spinlock, SleepLock, LockPair

// --- Pools ---
pub mod drivers; // Dispositivos de bloco (trait, registro, ramdisk)
pub mod fs; // Buffer cache
pub mod mm; // PMM particionado

pub use fs::bcache::{Buf, BufferCache, CacheConfig};
pub use mm::pmm::{MemLayout, Page, PagePool, PoolConfig};

/// Executa todas as suítes de self-test (PMM e buffer cache).
///
/// Retorna o número de falhas.
#[cfg(feature = "self_test")]
pub fn run_self_tests() -> usize {
    let (_, pmm_failed, _) = mm::test::run_memory_tests();
    let (_, bcache_failed, _) = fs::test::run_bcache_tests();
    pmm_failed + bcache_failed
}
