//! Aquisição de dois spinlocks em ordem total.
//!
//! Invariante: quando dois locks de shards são segurados ao mesmo tempo,
//! o de menor índice é adquirido primeiro e solto por último. Assim dois
//! cores que roubam um do outro nunca formam um ciclo de espera.

use super::spinlock::{Spinlock, SpinlockGuard};

/// Par de guards adquiridos em ordem crescente de índice.
///
/// Os campos são soltos na ordem de declaração: `hi` (adquirido por último)
/// sai primeiro, `lo` por último.
pub struct LockPair<'a, T> {
    hi: SpinlockGuard<'a, T>,
    lo: SpinlockGuard<'a, T>,
    first_is_lo: bool,
}

/// Adquire `first` (índice `first_idx`) e `second` (índice `second_idx`)
/// em ordem crescente de índice, independente do papel de cada um.
pub fn lock_pair<'a, T>(
    first: &'a Spinlock<T>,
    first_idx: usize,
    second: &'a Spinlock<T>,
    second_idx: usize,
) -> LockPair<'a, T> {
    if first_idx == second_idx {
        crate::kfatal!("(Sync) lock_pair: mesmo índice=", first_idx);
    }

    if first_idx < second_idx {
        let lo = first.lock();
        let hi = second.lock();
        LockPair { hi, lo, first_is_lo: true }
    } else {
        let lo = second.lock();
        let hi = first.lock();
        LockPair { hi, lo, first_is_lo: false }
    }
}

impl<T> LockPair<'_, T> {
    /// Dados dos dois locks, na ordem (first, second) de `lock_pair`.
    pub fn both(&mut self) -> (&mut T, &mut T) {
        if self.first_is_lo {
            (&mut *self.lo, &mut *self.hi)
        } else {
            (&mut *self.hi, &mut *self.lo)
        }
    }
}
