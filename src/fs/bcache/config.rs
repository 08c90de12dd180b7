//! Parâmetros do buffer cache.

use core::fmt;

/// Tamanho de um bloco do cache em bytes
pub const BLOCK_SIZE: usize = 1024;

/// Número padrão de slots
pub const NBUF: usize = 30;

/// Número padrão de shards (primo, espalha `blockno % NSHARDS`)
pub const NSHARDS: usize = 13;

/// Número de dispositivo que nenhum slot em branco aponta
pub const NO_DEV: u32 = u32::MAX;

/// Erros de configuração do buffer cache
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheError {
    /// Número de slots ou shards inválido, ou setor incompatível
    InvalidConfig,
    /// Dispositivo não registrado
    NoDevice,
}

impl CacheError {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidConfig => "Configuração do buffer cache inválida",
            Self::NoDevice => "Dispositivo de bloco não registrado",
        }
    }
}

impl fmt::Display for CacheError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tamanho do cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheConfig {
    /// Número de slots
    pub nbuf: usize,
    /// Número de shards (`blockno % nshards`)
    pub nshards: usize,
}

impl CacheConfig {
    pub const fn new(nbuf: usize, nshards: usize) -> Self {
        Self { nbuf, nshards }
    }

    pub fn validate(&self) -> Result<(), CacheError> {
        if self.nbuf == 0 || self.nshards == 0 || self.nbuf >= u32::MAX as usize {
            return Err(CacheError::InvalidConfig);
        }
        Ok(())
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self::new(NBUF, NSHARDS)
    }
}
