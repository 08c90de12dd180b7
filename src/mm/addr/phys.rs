use core::fmt;

use crate::mm::config::{align_up, is_aligned, PAGE_SIZE};

/// Endereço físico de um frame gerenciado pelo pool.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(transparent)]
pub struct PhysAddr(u64);

impl PhysAddr {
    #[inline]
    pub const fn new(addr: u64) -> Self {
        Self(addr)
    }

    #[inline]
    pub const fn as_u64(self) -> u64 {
        self.0
    }

    /// Próximo múltiplo de `align` (ou o próprio endereço)
    #[inline]
    pub fn align_up(self, align: u64) -> Self {
        Self(align_up(self.0 as usize, align as usize) as u64)
    }

    #[inline]
    pub fn is_page_aligned(self) -> bool {
        is_aligned(self.0 as usize, PAGE_SIZE)
    }

    #[inline]
    pub fn add(self, offset: u64) -> Self {
        Self(self.0 + offset)
    }

    /// Bytes desde `base`; `None` se o endereço fica abaixo dela.
    #[inline]
    pub fn offset_from(self, base: PhysAddr) -> Option<u64> {
        self.0.checked_sub(base.0)
    }
}

impl fmt::Debug for PhysAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PhysAddr({:#x})", self.0)
    }
}
