//! Testes do PMM (pool de páginas por CPU)
//!
//! Cada caso monta um `PagePool` próprio e pequeno, sem tocar no pool
//! global do kernel.

use crate::klib::test_framework::{TestCase, TestResult};
use crate::mm::addr::PhysAddr;
use crate::mm::config::{PAGE_FILL_ALLOC, PAGE_SIZE};
use crate::mm::pmm::{MemLayout, PagePool, PoolConfig, PoolFlags};

/// Testes do PMM
pub const PMM_TESTS: &[TestCase] = &[
    TestCase::new("pmm_alloc_free", test_alloc_free),
    TestCase::new("pmm_page_alignment", test_page_alignment),
    TestCase::new("pmm_boot_pages_allocatable", test_boot_pages_allocatable),
    TestCase::new("pmm_steal_half", test_steal_half),
    TestCase::new("pmm_exhaustion", test_exhaustion),
    TestCase::new("pmm_poison", test_poison),
];

const BASE: u64 = 0x10_0000;

fn make_pool(pages: usize, ncpu: usize, online: u64) -> Option<PagePool> {
    let layout = MemLayout::with_pages(PhysAddr::new(BASE), pages);
    let cfg = PoolConfig::new(ncpu)
        .with_online(online)
        .with_flags(PoolFlags::all());
    match PagePool::new(layout, cfg) {
        Ok(p) => Some(p),
        Err(e) => {
            crate::kerror!(e.as_str());
            None
        }
    }
}

/// Alocar e devolver 10 páginas na CPU 0
fn test_alloc_free() -> TestResult {
    let Some(pool) = make_pool(16, 2, 0b11) else {
        return TestResult::Fail;
    };

    let mut pages = alloc::vec::Vec::new();
    for i in 0..10usize {
        match pool.alloc_on(0) {
            Some(p) => pages.push(p),
            None => {
                crate::kerror!("(PMM) OOM ao alocar página índice=", i);
                return TestResult::Fail;
            }
        }
    }
    for p in pages {
        pool.free_on(0, p);
    }

    if pool.free_pages() != 16 {
        return TestResult::Fail;
    }
    TestResult::Pass
}

/// Toda página entregue é alinhada e está na região
fn test_page_alignment() -> TestResult {
    let Some(pool) = make_pool(8, 1, 0b1) else {
        return TestResult::Fail;
    };

    while let Some(page) = pool.alloc_on(0) {
        let addr = page.addr();
        if addr.as_u64() % PAGE_SIZE as u64 != 0 || !pool.contains(addr) {
            crate::kerror!("(PMM) Página desalinhada em=", addr.as_u64());
            return TestResult::Fail;
        }
        // Vaza de propósito: o pool local morre no fim do teste
        let _ = page.into_addr();
    }
    TestResult::Pass
}

/// Toda página distribuída no boot pode ser alocada, até por CPU offline
fn test_boot_pages_allocatable() -> TestResult {
    let Some(pool) = make_pool(7, 2, 0b01) else {
        return TestResult::Fail;
    };

    let mut pages = alloc::vec::Vec::new();
    while let Some(page) = pool.alloc_on(1) {
        pages.push(page);
    }
    let got = pages.len();
    for p in pages {
        pool.free_on(0, p);
    }

    if got != 7 || pool.free_pages() != 7 {
        crate::kerror!("(PMM) Páginas de boot alocadas=", got);
        return TestResult::Fail;
    }
    TestResult::Pass
}

/// CPU 1 vazia rouba metade da CPU 0
fn test_steal_half() -> TestResult {
    let Some(pool) = make_pool(8, 2, 0b01) else {
        return TestResult::Fail;
    };

    let Some(page) = pool.alloc_on(1) else {
        return TestResult::Fail;
    };
    let counts = pool.shard_free_counts();
    pool.free_on(1, page);

    if counts[0] != 4 || counts[1] != 3 {
        crate::kerror!("(PMM) Roubo: livres na CPU 0=", counts[0]);
        return TestResult::Fail;
    }
    TestResult::Pass
}

/// Sem páginas em lugar nenhum: None, sem pânico
fn test_exhaustion() -> TestResult {
    let Some(pool) = make_pool(2, 2, 0b11) else {
        return TestResult::Fail;
    };

    let (Some(a), Some(b)) = (pool.alloc_on(0), pool.alloc_on(0)) else {
        return TestResult::Fail;
    };
    let none = pool.alloc_on(1).is_none();
    pool.free_on(0, a);
    pool.free_on(1, b);

    if none {
        TestResult::Pass
    } else {
        TestResult::Fail
    }
}

/// Página alocada vem preenchida com o veneno de alocação
fn test_poison() -> TestResult {
    let Some(pool) = make_pool(2, 1, 0b1) else {
        return TestResult::Fail;
    };

    let Some(mut page) = pool.alloc_on(0) else {
        return TestResult::Fail;
    };
    let poisoned = pool.bytes(&page).iter().all(|&b| b == PAGE_FILL_ALLOC);
    pool.bytes_mut(&mut page)[0] = 0x42;
    pool.free_on(0, page);

    if poisoned {
        TestResult::Pass
    } else {
        TestResult::Fail
    }
}
