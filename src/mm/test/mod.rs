//! # Testes do Subsistema de Memória
//!
//! - `pmm_test.rs` - pool de páginas por CPU (alocação, roubo, veneno)

pub mod pmm_test;

use crate::klib::test_framework::run_test_suite;

/// Executa as suítes de memória. Retorna (passed, failed, skipped).
pub fn run_memory_tests() -> (usize, usize, usize) {
    run_test_suite("PMM", pmm_test::PMM_TESTS)
}
