//! # PMM - Physical Memory Manager
//!
//! Pool de páginas físicas de 4KiB com uma free list por CPU.
//!
//! - [`PagePool`]: o alocador em si (pode ter várias instâncias, ex. testes)
//! - [`init`] / [`page_alloc`] / [`page_free`]: pool global do kernel,
//!   usando a CPU corrente do HAL

pub mod frame;
pub mod pool;
pub mod region;
pub mod shard;
pub mod stats;

pub use frame::{Page, PageFrame};
pub use pool::PagePool;
pub use region::{MemLayout, PoolConfig, PoolFlags};
pub use shard::PageShard;
pub use stats::PoolStats;

use spin::Once;

use crate::mm::error::{MmError, MmResult};

/// Pool global de páginas
static PAGE_POOL: Once<PagePool> = Once::new();

/// Inicializa o pool global. Só pode ser chamado uma vez.
pub fn init(layout: MemLayout, config: PoolConfig) -> MmResult<&'static PagePool> {
    if PAGE_POOL.is_completed() {
        return Err(MmError::InitFailed);
    }
    let pool = PagePool::new(layout, config)?;

    let mut fresh = false;
    let installed = PAGE_POOL.call_once(|| {
        fresh = true;
        pool
    });
    if !fresh {
        return Err(MmError::InitFailed);
    }
    Ok(installed)
}

/// Pool global; fatal se `init` ainda não rodou.
pub fn pool() -> &'static PagePool {
    match PAGE_POOL.get() {
        Some(p) => p,
        None => crate::kfatal!("(PMM) Pool usado antes de init"),
    }
}

/// Pool global, se já inicializado
pub fn try_pool() -> Option<&'static PagePool> {
    PAGE_POOL.get()
}

/// Aloca uma página na CPU corrente.
pub fn page_alloc() -> Option<Page> {
    pool().alloc_on(crate::hal::cpu().id())
}

/// Devolve uma página à lista da CPU corrente.
pub fn page_free(page: Page) {
    pool().free_on(crate::hal::cpu().id(), page)
}
