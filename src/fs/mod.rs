//! Camada de blocos do sistema de arquivos.
//!
//! Submódulos:
//! - `bcache`: buffer cache particionado por hash com LRU por shard.
//!
//! Layout em disco, inodes e log ficam acima deste crate e só enxergam
//! blocos através de `bcache::{bread, bwrite, brelse, bpin, bunpin}`.

pub mod bcache;

#[cfg(feature = "self_test")]
pub mod test;
