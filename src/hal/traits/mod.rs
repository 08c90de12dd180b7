//! Traits do HAL
//!
//! Define as interfaces abstratas consumidas pelos pools.

pub mod cpu;
pub mod sched;

pub use cpu::*;
pub use sched::*;
