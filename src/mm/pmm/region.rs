use crate::mm::addr::PhysAddr;
use crate::mm::config::{MAX_CPUS, PAGE_SIZE};
use crate::mm::error::{MmError, MmResult};

/// Região física gerenciada pelo PMM.
///
/// As páginas cobrem `[align_up(kernel_end), phys_top)`: tudo o que vem
/// depois da imagem do kernel até o topo da RAM.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemLayout {
    /// Primeiro endereço após a imagem do kernel (`end` do linker script)
    pub kernel_end: PhysAddr,
    /// Topo da memória física (exclusivo)
    pub phys_top: PhysAddr,
}

impl MemLayout {
    pub const fn new(kernel_end: PhysAddr, phys_top: PhysAddr) -> Self {
        Self {
            kernel_end,
            phys_top,
        }
    }

    /// Layout com `pages` páginas começando em `base` (alinhado).
    pub fn with_pages(base: PhysAddr, pages: usize) -> Self {
        Self {
            kernel_end: base,
            phys_top: base.add((pages * PAGE_SIZE) as u64),
        }
    }

    /// Primeira página gerenciada
    pub fn first_page(&self) -> PhysAddr {
        self.kernel_end.align_up(PAGE_SIZE as u64)
    }

    /// Número de páginas inteiras na região
    pub fn page_count(&self) -> usize {
        let start = self.first_page().as_u64();
        let top = self.phys_top.as_u64();
        if top <= start {
            0
        } else {
            ((top - start) / PAGE_SIZE as u64) as usize
        }
    }

    /// Valida o layout: pelo menos uma página e índices cabendo em u32.
    pub fn validate(&self) -> MmResult<usize> {
        let pages = self.page_count();
        if pages == 0 || pages >= u32::MAX as usize {
            return Err(MmError::InvalidParameter);
        }
        Ok(pages)
    }
}

bitflags::bitflags! {
    /// Diagnósticos de memória do PMM
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct PoolFlags: u32 {
        /// Preenche páginas liberadas com `PAGE_FILL_FREE`
        const POISON_ON_FREE = 1 << 0;
        /// Preenche páginas alocadas com `PAGE_FILL_ALLOC`
        const POISON_ON_ALLOC = 1 << 1;
    }
}

impl PoolFlags {
    /// Flags padrão do build: veneno ligado só com a feature `page_poison`.
    pub const fn build_default() -> Self {
        if cfg!(feature = "page_poison") {
            Self::all()
        } else {
            Self::empty()
        }
    }
}

/// Configuração do PMM particionado.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolConfig {
    /// Número de CPUs (= número de shards)
    pub ncpu: usize,
    /// Bitmask das CPUs online; as páginas iniciais são divididas entre elas.
    /// Máscara vazia: todas as páginas começam alocadas (ver `free_range`).
    pub online: u64,
    pub flags: PoolFlags,
}

impl PoolConfig {
    /// `ncpu` CPUs, todas online.
    pub fn new(ncpu: usize) -> Self {
        let online = if ncpu >= 64 { u64::MAX } else { (1u64 << ncpu) - 1 };
        Self {
            ncpu,
            online,
            flags: PoolFlags::build_default(),
        }
    }

    pub fn with_online(mut self, online: u64) -> Self {
        self.online = online;
        self
    }

    pub fn with_flags(mut self, flags: PoolFlags) -> Self {
        self.flags = flags;
        self
    }

    /// CPU `cpu` está online?
    pub fn is_online(&self, cpu: usize) -> bool {
        cpu < self.ncpu && cpu < 64 && self.online & (1u64 << cpu) != 0
    }

    pub fn validate(&self) -> MmResult<()> {
        if self.ncpu == 0 || self.ncpu > MAX_CPUS {
            return Err(MmError::InvalidParameter);
        }
        Ok(())
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self::new(MAX_CPUS)
    }
}
