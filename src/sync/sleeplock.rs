//! SleepLock - lock de longa duração que cede a CPU

use core::cell::UnsafeCell;
use core::ops::{Deref, DerefMut};
use core::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use crate::hal;

/// SleepLock - bloqueia a tarefa se não conseguir o lock
///
/// # Diferença do Spinlock
///
/// - SleepLock cede a CPU ([`SchedOps::yield_now`](crate::hal::SchedOps))
///   enquanto espera; Spinlock gira com interrupções desabilitadas.
/// - SleepLock não desabilita interrupções e pode ser segurado durante I/O.
/// - SleepLock registra a tarefa dona, permitindo [`SleepLock::holding`].
///
/// Usado como lock de conteúdo dos slots do buffer cache.
pub struct SleepLock<T> {
    /// Estado do lock
    locked: AtomicBool,
    /// ID da tarefa dona (0 = livre)
    holder: AtomicUsize,
    name: &'static str,
    /// Dados protegidos
    data: UnsafeCell<T>,
}

// SAFETY: SleepLock protege acesso com lock
unsafe impl<T: Send> Send for SleepLock<T> {}
unsafe impl<T: Send> Sync for SleepLock<T> {}

impl<T> SleepLock<T> {
    pub const fn new(name: &'static str, data: T) -> Self {
        Self {
            locked: AtomicBool::new(false),
            holder: AtomicUsize::new(0),
            name,
            data: UnsafeCell::new(data),
        }
    }

    /// Adquire o lock (pode ceder a CPU várias vezes)
    pub fn lock(&self) -> SleepLockGuard<'_, T> {
        let sched = hal::sched();
        while self
            .locked
            .compare_exchange_weak(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_err()
        {
            sched.yield_now();
        }
        self.holder.store(sched.current_task(), Ordering::Relaxed);

        SleepLockGuard { lock: self }
    }

    /// Tenta adquirir sem bloquear
    pub fn try_lock(&self) -> Option<SleepLockGuard<'_, T>> {
        if self
            .locked
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_ok()
        {
            self.holder
                .store(hal::sched().current_task(), Ordering::Relaxed);
            Some(SleepLockGuard { lock: self })
        } else {
            None
        }
    }

    /// A tarefa atual segura este lock?
    pub fn holding(&self) -> bool {
        self.locked.load(Ordering::Acquire)
            && self.holder.load(Ordering::Relaxed) == hal::sched().current_task()
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

pub struct SleepLockGuard<'a, T> {
    lock: &'a SleepLock<T>,
}

impl<'a, T> SleepLockGuard<'a, T> {
    /// Lock de origem deste guard
    pub fn lock(&self) -> &'a SleepLock<T> {
        self.lock
    }
}

impl<T> Deref for SleepLockGuard<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        // SAFETY: Lock está adquirido
        unsafe { &*self.lock.data.get() }
    }
}

impl<T> DerefMut for SleepLockGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        // SAFETY: Lock está adquirido
        unsafe { &mut *self.lock.data.get() }
    }
}

impl<T> Drop for SleepLockGuard<'_, T> {
    fn drop(&mut self) {
        self.lock.holder.store(0, Ordering::Relaxed);
        self.lock.locked.store(false, Ordering::Release);
    }
}
