//! Aninhamento de desabilitação de interrupções por CPU.
//!
//! `push_off`/`pop_off` funcionam como `cli`/`sti` contados: são precisos
//! tantos `pop_off` quanto `push_off` para reabilitar interrupções, e o
//! estado original (habilitado ou não) é restaurado só no último `pop_off`.
//!
//! Isso permite soltar dois spinlocks em qualquer ordem sem reabilitar
//! interrupções enquanto um deles ainda está preso.

use core::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use crate::mm::config::MAX_CPUS;

/// Estado de interrupções de uma CPU.
#[repr(C, align(64))]
struct IrqState {
    /// Profundidade de `push_off`
    depth: AtomicUsize,
    /// Interrupções estavam habilitadas antes do primeiro `push_off`?
    was_enabled: AtomicBool,
}

impl IrqState {
    const fn new() -> Self {
        Self {
            depth: AtomicUsize::new(0),
            was_enabled: AtomicBool::new(false),
        }
    }
}

#[allow(clippy::declare_interior_mutable_const)]
const IRQ_INIT: IrqState = IrqState::new();
static IRQ_STATE: [IrqState; MAX_CPUS] = [IRQ_INIT; MAX_CPUS];

fn state() -> &'static IrqState {
    let id = super::cpu().id();
    if id >= MAX_CPUS {
        crate::kfatal!("(HAL) ID de CPU fora do limite=", id);
    }
    &IRQ_STATE[id]
}

/// Desabilita interrupções, empilhando o estado anterior.
pub fn push_off() {
    let cpu = super::cpu();
    let enabled = cpu.interrupts_enabled();
    cpu.disable_interrupts();

    let st = state();
    if st.depth.fetch_add(1, Ordering::AcqRel) == 0 {
        st.was_enabled.store(enabled, Ordering::Relaxed);
    }
}

/// Desempilha um nível; no último reabilita interrupções se estavam ativas.
pub fn pop_off() {
    let st = state();
    let prev = st.depth.fetch_sub(1, Ordering::AcqRel);
    if prev == 0 {
        st.depth.store(0, Ordering::Release);
        crate::kfatal!("(HAL) pop_off sem push_off");
    }
    if prev == 1 && st.was_enabled.load(Ordering::Relaxed) {
        super::cpu().enable_interrupts();
    }
}

/// Profundidade atual de `push_off` na CPU corrente.
pub fn depth() -> usize {
    state().depth.load(Ordering::Acquire)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_pop_balanced() {
        // Threads de teste compartilham a CPU de boot (id 0), então só
        // verificamos que o par não quebra o contador.
        push_off();
        push_off();
        pop_off();
        pop_off();
    }
}
