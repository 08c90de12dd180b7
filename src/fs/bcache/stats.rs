use core::sync::atomic::{AtomicUsize, Ordering};

/// Contadores do buffer cache
#[derive(Debug, Default)]
pub struct CacheStats {
    pub hits: AtomicUsize,
    pub misses: AtomicUsize,
    /// Roubos entre shards
    pub steals: AtomicUsize,
    /// Slots movidos por roubos
    pub stolen_slots: AtomicUsize,
    /// Leituras de bloco no dispositivo
    pub reads: AtomicUsize,
    /// Escritas de bloco no dispositivo
    pub writes: AtomicUsize,
}

impl CacheStats {
    #[inline]
    pub fn inc(counter: &AtomicUsize) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_steal(&self, slots: usize) {
        self.steals.fetch_add(1, Ordering::Relaxed);
        self.stolen_slots.fetch_add(slots, Ordering::Relaxed);
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn misses(&self) -> usize {
        self.misses.load(Ordering::Relaxed)
    }

    pub fn steals(&self) -> usize {
        self.steals.load(Ordering::Relaxed)
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::Relaxed)
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::Relaxed)
    }
}
