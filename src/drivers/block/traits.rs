//! # Abstração de Dispositivos de Bloco
//!
//! O buffer cache fala com o disco só por esta trait. As operações são
//! síncronas: quando `read_blocks` retorna, os dados já estão no buffer.
//!
//! ```text
//! bcache (blocos de BLOCK_SIZE)
//!     ↓  lba = blockno * (BLOCK_SIZE / block_size())
//! BlockDevice (setores de block_size())
//! ```

use core::fmt;

/// Tipos de erro para dispositivos de bloco
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockError {
    /// Dispositivo não registrado
    NotFound,
    /// LBA fora do dispositivo
    InvalidBlock,
    /// Erro de I/O durante leitura/escrita
    IoError,
    /// Escrita em dispositivo somente leitura
    ReadOnly,
    /// Buffer não é múltiplo do tamanho de setor
    InvalidBuffer,
}

impl BlockError {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotFound => "Dispositivo não encontrado",
            Self::InvalidBlock => "Endereço de bloco inválido",
            Self::IoError => "Erro de I/O",
            Self::ReadOnly => "Dispositivo somente leitura",
            Self::InvalidBuffer => "Tamanho do buffer inválido",
        }
    }
}

impl fmt::Display for BlockError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Dispositivo de bloco síncrono.
pub trait BlockDevice: Send + Sync {
    /// Lê um setor (`buf` tem pelo menos `block_size()` bytes)
    fn read_block(&self, lba: u64, buf: &mut [u8]) -> Result<(), BlockError>;

    /// Escreve um setor
    fn write_block(&self, lba: u64, buf: &[u8]) -> Result<(), BlockError>;

    /// Tamanho do setor em bytes (normalmente 512)
    fn block_size(&self) -> usize;

    /// Número total de setores
    fn total_blocks(&self) -> u64;

    fn is_read_only(&self) -> bool {
        false
    }

    /// Lê setores contíguos a partir de `start_lba`
    fn read_blocks(&self, start_lba: u64, buf: &mut [u8]) -> Result<(), BlockError> {
        let bs = self.block_size();
        if bs == 0 || buf.len() % bs != 0 {
            return Err(BlockError::InvalidBuffer);
        }
        for (i, chunk) in buf.chunks_exact_mut(bs).enumerate() {
            self.read_block(start_lba + i as u64, chunk)?;
        }
        Ok(())
    }

    /// Escreve setores contíguos a partir de `start_lba`
    fn write_blocks(&self, start_lba: u64, buf: &[u8]) -> Result<(), BlockError> {
        let bs = self.block_size();
        if bs == 0 || buf.len() % bs != 0 {
            return Err(BlockError::InvalidBuffer);
        }
        for (i, chunk) in buf.chunks_exact(bs).enumerate() {
            self.write_block(start_lba + i as u64, chunk)?;
        }
        Ok(())
    }
}
