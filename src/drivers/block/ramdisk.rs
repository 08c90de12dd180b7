//! # Ramdisk
//!
//! Disco em memória. Conta as requisições (uma por chamada de
//! `read_blocks`/`write_blocks`) e permite injetar falha de I/O.

use alloc::vec;
use alloc::vec::Vec;
use core::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use super::traits::{BlockDevice, BlockError};
use crate::sync::Spinlock;

pub struct RamDisk {
    data: Spinlock<Vec<u8>>,
    block_size: usize,
    blocks: u64,
    read_only: bool,
    failing: AtomicBool,
    reads: AtomicUsize,
    writes: AtomicUsize,
}

impl RamDisk {
    /// Disco zerado com `blocks` setores de `block_size` bytes.
    pub fn new(blocks: u64, block_size: usize) -> Self {
        Self {
            data: Spinlock::named("ramdisk", vec![0; blocks as usize * block_size]),
            block_size,
            blocks,
            read_only: false,
            failing: AtomicBool::new(false),
            reads: AtomicUsize::new(0),
            writes: AtomicUsize::new(0),
        }
    }

    /// Disco somente leitura com o conteúdo de `image`.
    pub fn from_image(image: &[u8], block_size: usize) -> Self {
        let blocks = (image.len() / block_size) as u64;
        let disk = Self::new(blocks, block_size);
        disk.data.lock().copy_from_slice(&image[..blocks as usize * block_size]);
        Self {
            read_only: true,
            ..disk
        }
    }

    /// Faz toda requisição seguinte falhar com `IoError`.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::Relaxed);
    }

    /// Requisições de leitura atendidas
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::Relaxed)
    }

    /// Requisições de escrita atendidas
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::Relaxed)
    }

    /// Faixa de bytes para `len` bytes a partir do setor `lba`
    fn range(&self, lba: u64, len: usize) -> Result<core::ops::Range<usize>, BlockError> {
        if self.failing.load(Ordering::Relaxed) {
            return Err(BlockError::IoError);
        }
        if len == 0 || len % self.block_size != 0 {
            return Err(BlockError::InvalidBuffer);
        }
        let count = (len / self.block_size) as u64;
        if lba.checked_add(count).map_or(true, |end| end > self.blocks) {
            return Err(BlockError::InvalidBlock);
        }
        let start = lba as usize * self.block_size;
        Ok(start..start + len)
    }
}

impl BlockDevice for RamDisk {
    fn read_block(&self, lba: u64, buf: &mut [u8]) -> Result<(), BlockError> {
        let bs = self.block_size;
        if buf.len() < bs {
            return Err(BlockError::InvalidBuffer);
        }
        self.read_blocks(lba, &mut buf[..bs])
    }

    fn write_block(&self, lba: u64, buf: &[u8]) -> Result<(), BlockError> {
        let bs = self.block_size;
        if buf.len() < bs {
            return Err(BlockError::InvalidBuffer);
        }
        self.write_blocks(lba, &buf[..bs])
    }

    fn block_size(&self) -> usize {
        self.block_size
    }

    fn total_blocks(&self) -> u64 {
        self.blocks
    }

    fn is_read_only(&self) -> bool {
        self.read_only
    }

    fn read_blocks(&self, start_lba: u64, buf: &mut [u8]) -> Result<(), BlockError> {
        let range = self.range(start_lba, buf.len())?;
        buf.copy_from_slice(&self.data.lock()[range]);
        self.reads.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    fn write_blocks(&self, start_lba: u64, buf: &[u8]) -> Result<(), BlockError> {
        if self.read_only {
            return Err(BlockError::ReadOnly);
        }
        let range = self.range(start_lba, buf.len())?;
        self.data.lock()[range].copy_from_slice(buf);
        self.writes.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}
