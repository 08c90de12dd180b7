//! Framework de testes do kernel
//!
//! Suítes executadas no boot (feature `self_test`). Cada caso devolve um
//! [`TestResult`]; o resumo vai para a serial via `kok!`/`kfail!`.

/// Resultado de teste
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestResult {
    Pass,
    Fail,
    Skip,
}

/// Um caso de teste
pub struct TestCase {
    pub name: &'static str,
    pub func: fn() -> TestResult,
}

impl TestCase {
    pub const fn new(name: &'static str, func: fn() -> TestResult) -> Self {
        Self { name, func }
    }
}

/// Executa suíte de testes. Retorna (passed, failed, skipped).
pub fn run_test_suite(name: &'static str, tests: &[TestCase]) -> (usize, usize, usize) {
    crate::kinfo!("=== Executando suíte:");
    crate::kinfo!(name);

    let mut passed = 0;
    let mut failed = 0;
    let mut skipped = 0;

    for test in tests {
        match (test.func)() {
            TestResult::Pass => {
                crate::kok!(test.name);
                passed += 1;
            }
            TestResult::Fail => {
                crate::kfail!(test.name);
                failed += 1;
            }
            TestResult::Skip => {
                crate::kwarn!("[SKIP]");
                crate::kwarn!(test.name);
                skipped += 1;
            }
        }
    }

    crate::kinfo!("Resultados: passed=", passed);
    if failed > 0 {
        crate::kerror!("Resultados: failed=", failed);
    }
    (passed, failed, skipped)
}
