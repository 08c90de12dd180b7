//! # Buffer Cache
//!
//! Cópias em memória de blocos de disco, com um lock de conteúdo por bloco.
//!
//! ## Interface
//!
//! - [`bread`] devolve o bloco travado (lê do disco se preciso)
//! - [`bwrite`] grava o conteúdo alterado; exige o bloco travado
//! - [`brelse`] (ou dropar o [`Buf`]) solta o bloco
//! - [`bpin`] / [`bunpin`] seguram o slot além do `Buf` (ex.: log)
//!
//! Só uma tarefa por vez usa um bloco: não segure `Buf` mais que o necessário.

pub mod buf;
pub mod cache;
pub mod config;
pub mod shard;
pub mod slot;
pub mod stats;

pub use buf::Buf;
pub use cache::BufferCache;
pub use config::{CacheConfig, CacheError, BLOCK_SIZE, NBUF, NSHARDS};
pub use stats::CacheStats;

use spin::Once;

/// Buffer cache global
static BCACHE: Once<BufferCache> = Once::new();

/// Inicializa o cache global sobre a tabela global de dispositivos.
pub fn init(config: CacheConfig) -> Result<&'static BufferCache, CacheError> {
    if BCACHE.is_completed() {
        return Err(CacheError::InvalidConfig);
    }
    let cache = BufferCache::new(config, crate::drivers::block::devices())?;

    let mut fresh = false;
    let installed = BCACHE.call_once(|| {
        fresh = true;
        cache
    });
    if !fresh {
        return Err(CacheError::InvalidConfig);
    }
    Ok(installed)
}

/// Cache global; fatal se `init` ainda não rodou.
pub fn cache() -> &'static BufferCache {
    match BCACHE.get() {
        Some(c) => c,
        None => crate::kfatal!("(BCache) Cache usado antes de init"),
    }
}

pub fn bread(dev: u32, blockno: u32) -> Buf<'static> {
    cache().read(dev, blockno)
}

pub fn bwrite(buf: &Buf<'static>) {
    cache().write(buf)
}

pub fn brelse(buf: Buf<'static>) {
    cache().release(buf)
}

pub fn bpin(buf: &Buf<'static>) {
    cache().pin(buf)
}

pub fn bunpin(buf: &Buf<'static>) {
    cache().unpin(buf)
}
