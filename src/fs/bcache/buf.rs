//! Buffer travado devolvido por `read`.

use core::fmt;
use core::mem::ManuallyDrop;

use super::cache::BufferCache;
use super::config::BLOCK_SIZE;
use crate::sync::SleepLockGuard;

/// Bloco em cache com o lock de conteúdo preso pela tarefa atual.
///
/// Soltar o `Buf` (ou chamar [`BufferCache::release`]) solta o lock de
/// conteúdo e devolve a referência ao shard.
pub struct Buf<'a> {
    cache: &'a BufferCache,
    slot: u32,
    guard: ManuallyDrop<SleepLockGuard<'a, [u8; BLOCK_SIZE]>>,
}

impl<'a> Buf<'a> {
    pub(super) fn new(
        cache: &'a BufferCache,
        slot: u32,
        guard: SleepLockGuard<'a, [u8; BLOCK_SIZE]>,
    ) -> Self {
        Self {
            cache,
            slot,
            guard: ManuallyDrop::new(guard),
        }
    }

    /// Conteúdo do bloco
    pub fn data(&self) -> &[u8; BLOCK_SIZE] {
        &self.guard
    }

    /// Conteúdo do bloco (escrita só vai ao disco com `BufferCache::write`)
    pub fn data_mut(&mut self) -> &mut [u8; BLOCK_SIZE] {
        &mut self.guard
    }

    pub fn dev(&self) -> u32 {
        self.cache.slot(self.slot).dev()
    }

    pub fn blockno(&self) -> u32 {
        self.cache.slot(self.slot).blockno()
    }

    /// Índice do slot no cache
    pub fn slot(&self) -> usize {
        self.slot as usize
    }

    /// Referências ao slot (este buffer + pins + quem espera o conteúdo)
    pub fn refcnt(&self) -> u32 {
        self.cache.slot(self.slot).refcnt()
    }

    pub(super) fn slot_index(&self) -> u32 {
        self.slot
    }

    /// Equivalente a `BufferCache::release(buf)`.
    pub fn release(self) {}
}

impl Drop for Buf<'_> {
    fn drop(&mut self) {
        if !self.cache.slot(self.slot).content.holding() {
            crate::kfatal!("(BCache) brelse: lock de conteúdo não pertence à tarefa, slot=", self.slot);
        }
        // SAFETY: o guard não é usado depois daqui.
        unsafe { ManuallyDrop::drop(&mut self.guard) };
        self.cache.unref(self.slot);
    }
}

impl fmt::Debug for Buf<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Buf")
            .field("dev", &self.dev())
            .field("blockno", &self.blockno())
            .field("slot", &self.slot)
            .field("refcnt", &self.refcnt())
            .finish()
    }
}
