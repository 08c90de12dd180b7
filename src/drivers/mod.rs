//! # Drivers
//!
//! Só o que o buffer cache consome: dispositivos de bloco.
//!
//! ```text
//! ┌──────────────────────────────┐
//! │   fs::bcache (BufferCache)   │
//! └──────────────────────────────┘
//!               ↓ read_blocks / write_blocks
//! ┌──────────────────────────────┐
//! │   DeviceTable (dev -> Arc)   │
//! └──────────────────────────────┘
//!               ↓
//! ┌──────────────────────────────┐
//! │   BlockDevice (RamDisk, ...) │
//! └──────────────────────────────┘
//! ```

pub mod block;
