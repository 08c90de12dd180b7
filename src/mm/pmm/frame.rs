use core::cell::UnsafeCell;
use core::fmt;
use core::ptr::NonNull;

use volatile::VolatilePtr;

use crate::mm::addr::PhysAddr;
use crate::mm::config::PAGE_SIZE;

/// Armazenamento de um frame físico (4KiB, alinhado a página).
///
/// O conteúdo só é acessado por quem possui a `Page` correspondente, ou pelo
/// próprio pool enquanto o frame está livre e sob o lock do shard.
#[repr(C, align(4096))]
pub struct PageFrame(UnsafeCell<[u8; PAGE_SIZE]>);

// SAFETY: acesso ao conteúdo é exclusivo pela posse da `Page` (ver PagePool).
unsafe impl Sync for PageFrame {}

impl PageFrame {
    pub const fn new() -> Self {
        Self(UnsafeCell::new([0; PAGE_SIZE]))
    }

    /// Preenche o frame inteiro com `byte`.
    ///
    /// Escrita volátil: o compilador não pode descartar o veneno mesmo que
    /// ninguém leia o frame em seguida.
    ///
    /// # Safety
    /// O chamador precisa ter acesso exclusivo ao frame.
    pub unsafe fn fill(&self, byte: u8) {
        let ptr = NonNull::new_unchecked(self.0.get());
        VolatilePtr::new(ptr).write([byte; PAGE_SIZE]);
    }

    /// # Safety
    /// Não pode haver escritor concorrente.
    pub unsafe fn bytes(&self) -> &[u8; PAGE_SIZE] {
        &*self.0.get()
    }

    /// # Safety
    /// O chamador precisa ter acesso exclusivo ao frame.
    #[allow(clippy::mut_from_ref)]
    pub unsafe fn bytes_mut(&self) -> &mut [u8; PAGE_SIZE] {
        &mut *self.0.get()
    }
}

impl Default for PageFrame {
    fn default() -> Self {
        Self::new()
    }
}

/// Página física alocada (posse exclusiva).
///
/// Não é `Copy` nem `Clone`: devolver a página ao pool consome o valor.
#[must_use = "páginas não devolvidas com page_free vazam"]
#[derive(PartialEq, Eq)]
pub struct Page {
    addr: PhysAddr,
}

impl Page {
    pub(super) const fn new(addr: PhysAddr) -> Self {
        Self { addr }
    }

    /// Reconstrói uma página a partir do endereço físico.
    ///
    /// # Safety
    /// O endereço deve ter vindo de `into_addr` de uma página ainda alocada,
    /// e nenhuma outra `Page` para ele pode existir.
    pub const unsafe fn from_addr(addr: PhysAddr) -> Self {
        Self { addr }
    }

    #[inline]
    pub const fn addr(&self) -> PhysAddr {
        self.addr
    }

    /// Consome a página sem devolvê-la (posse passa para o endereço).
    #[inline]
    pub fn into_addr(self) -> PhysAddr {
        self.addr
    }
}

impl fmt::Debug for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Page({:?})", self.addr)
    }
}
