//! Kernel Core
//!
//! Infraestrutura mínima compartilhada pelos pools: logging zero-overhead e
//! o caminho fatal (halt) para violações de protocolo e exaustão.

pub mod logging;
pub mod panic;

pub use panic::fatal;
