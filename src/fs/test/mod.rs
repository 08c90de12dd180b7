//! # Testes da Camada de Blocos
//!
//! - `bcache_test.rs` - buffer cache (hit/miss, LRU, pin, roubo)

pub mod bcache_test;

use crate::klib::test_framework::run_test_suite;

/// Executa as suítes do buffer cache. Retorna (passed, failed, skipped).
pub fn run_bcache_tests() -> (usize, usize, usize) {
    run_test_suite("BCache", bcache_test::BCACHE_TESTS)
}
