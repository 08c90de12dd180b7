use core::sync::atomic::{AtomicUsize, Ordering};

/// Contadores do PMM (leitura sem lock, só diagnóstico).
#[derive(Debug, Default)]
pub struct PoolStats {
    pub total_pages: usize,
    pub allocs: AtomicUsize,
    pub frees: AtomicUsize,
    pub failed_allocs: AtomicUsize,
    /// Número de roubos entre CPUs
    pub steals: AtomicUsize,
    /// Total de páginas movidas por roubos
    pub stolen_pages: AtomicUsize,
}

impl PoolStats {
    pub const fn new(total_pages: usize) -> Self {
        Self {
            total_pages,
            allocs: AtomicUsize::new(0),
            frees: AtomicUsize::new(0),
            failed_allocs: AtomicUsize::new(0),
            steals: AtomicUsize::new(0),
            stolen_pages: AtomicUsize::new(0),
        }
    }

    pub fn inc_alloc(&self) {
        self.allocs.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_free(&self) {
        self.frees.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_failed(&self) {
        self.failed_allocs.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_steal(&self, pages: usize) {
        self.steals.fetch_add(1, Ordering::Relaxed);
        self.stolen_pages.fetch_add(pages, Ordering::Relaxed);
    }

    pub fn steals(&self) -> usize {
        self.steals.load(Ordering::Relaxed)
    }

    pub fn allocs(&self) -> usize {
        self.allocs.load(Ordering::Relaxed)
    }

    pub fn frees(&self) -> usize {
        self.frees.load(Ordering::Relaxed)
    }

    pub fn failed(&self) -> usize {
        self.failed_allocs.load(Ordering::Relaxed)
    }
}
