//! Kernel Library (KLib).
//!
//! Utilitários agnósticos de hardware para uso interno dos pools.

pub mod list;

#[cfg(feature = "self_test")]
pub mod test_framework;
