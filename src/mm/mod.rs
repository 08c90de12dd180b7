//! # Memory Management (MM)
//!
//! Só a parte física: páginas de 4KiB distribuídas por CPU.
//!
//! | Módulo   | Responsabilidade |
//! |----------|------------------|
//! | `pmm`    | Pool de páginas por CPU com roubo entre CPUs |
//! | `addr`   | `PhysAddr` |
//! | `config` | Constantes, veneno, alinhamento |
//! | `error`  | `MmError` / `MmResult` |
//!
//! Tradução virtual e heap ficam fora deste crate: o kernel fornece o
//! alocador global (`alloc`) antes de chamar [`pmm::init`].

pub mod addr;
pub mod config;
pub mod error;
pub mod pmm;

#[cfg(feature = "self_test")]
pub mod test;

pub use addr::PhysAddr;
pub use error::{MmError, MmResult};
