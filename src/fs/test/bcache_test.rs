//! Testes do buffer cache
//!
//! Cada caso usa um cache e um ramdisk próprios, fora do cache global.

use alloc::sync::Arc;

use crate::drivers::block::{DeviceTable, RamDisk};
use crate::fs::bcache::{BufferCache, CacheConfig};
use crate::klib::test_framework::{TestCase, TestResult};

/// Testes do buffer cache
pub const BCACHE_TESTS: &[TestCase] = &[
    TestCase::new("bcache_hit_after_miss", test_hit_after_miss),
    TestCase::new("bcache_write_persists", test_write_persists),
    TestCase::new("bcache_lru_order", test_lru_order),
    TestCase::new("bcache_pin", test_pin),
    TestCase::new("bcache_steal", test_steal),
];

const DEV: u32 = 0;

fn setup(nbuf: usize, nshards: usize) -> Option<(BufferCache, Arc<RamDisk>)> {
    let table = Arc::new(DeviceTable::new());
    let disk = Arc::new(RamDisk::new(32, 512));
    table.insert(DEV, disk.clone());
    match BufferCache::new(CacheConfig::new(nbuf, nshards), table) {
        Ok(c) => Some((c, disk)),
        Err(e) => {
            crate::kerror!(e.as_str());
            None
        }
    }
}

/// Segunda leitura do mesmo bloco não vai ao disco
fn test_hit_after_miss() -> TestResult {
    let Some((cache, disk)) = setup(4, 2) else {
        return TestResult::Fail;
    };

    cache.read(DEV, 5).release();
    cache.read(DEV, 5).release();

    if disk.reads() != 1 || cache.stats().hits() != 1 {
        crate::kerror!("(BCache) Leituras no disco=", disk.reads());
        return TestResult::Fail;
    }
    TestResult::Pass
}

/// Escrita chega ao disco e sobrevive à reciclagem do slot
fn test_write_persists() -> TestResult {
    let Some((cache, _disk)) = setup(1, 1) else {
        return TestResult::Fail;
    };

    let mut b = cache.read(DEV, 2);
    b.data_mut()[0] = 0x77;
    cache.write(&b);
    b.release();

    // Força reciclagem do único slot
    cache.read(DEV, 3).release();

    let b = cache.read(DEV, 2);
    if b.data()[0] != 0x77 {
        return TestResult::Fail;
    }
    TestResult::Pass
}

/// Liberar B, A, C: o próximo miss recicla B
fn test_lru_order() -> TestResult {
    let Some((cache, _disk)) = setup(3, 1) else {
        return TestResult::Fail;
    };

    let b = cache.read(DEV, 1);
    let a = cache.read(DEV, 2);
    let c = cache.read(DEV, 3);
    let slot_b = b.slot();
    b.release();
    a.release();
    c.release();

    if cache.read(DEV, 4).slot() != slot_b {
        return TestResult::Fail;
    }
    TestResult::Pass
}

/// Slot com pin não é reciclado
fn test_pin() -> TestResult {
    let Some((cache, _disk)) = setup(2, 1) else {
        return TestResult::Fail;
    };

    let a = cache.read(DEV, 0);
    let slot_a = a.slot();
    cache.pin(&a);
    a.release();

    let mut ok = true;
    for blockno in 1..4 {
        ok &= cache.read(DEV, blockno).slot() != slot_a;
    }

    let a = cache.read(DEV, 0);
    cache.unpin(&a);
    a.release();

    if ok && cache.free_slots() == 2 {
        TestResult::Pass
    } else {
        TestResult::Fail
    }
}

/// Shard vazio rouba do mais cheio
fn test_steal() -> TestResult {
    let Some((cache, _disk)) = setup(4, 2) else {
        return TestResult::Fail;
    };

    let x = cache.read(DEV, 0);
    let y = cache.read(DEV, 2);
    let z = cache.read(DEV, 4);
    let counts = cache.shard_free_counts();
    let stolen = cache.slot_shard(z.slot()) == 0 && z.slot() % 2 == 1;
    drop((x, y, z));

    if cache.stats().steals() == 1 && stolen && counts[1] == 1 {
        TestResult::Pass
    } else {
        TestResult::Fail
    }
}
