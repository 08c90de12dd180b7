//! # Synchronization Primitives
//!
//! Primitivas de sincronização para ambiente SMP.
//!
//! ## Hierarquia de Uso
//!
//! ```text
//! Spinlock   → Locks estruturais dos shards (não pode dormir)
//! SleepLock  → Lock de conteúdo dos slots do buffer cache (pode ceder a CPU)
//! LockPair   → Dois spinlocks de shards ao mesmo tempo (ordem por índice)
//! ```
//!
//! ## Regras
//!
//! - **Spinlock**: Nunca segurar durante I/O ou espera de SleepLock
//! - **SleepLock**: Nunca adquirir com um Spinlock preso
//! - **Ordem de Lock**: Dois shards → sempre o de menor índice primeiro

pub mod ordered;
pub mod sleeplock;
pub mod spinlock;

pub use ordered::{lock_pair, LockPair};
pub use sleeplock::{SleepLock, SleepLockGuard};
pub use spinlock::{Spinlock, SpinlockGuard};
