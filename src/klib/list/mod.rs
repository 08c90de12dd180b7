//! Listas do kernel.

pub mod index;

pub use index::{IndexList, LinkTable, NIL};
