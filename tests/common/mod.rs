//! Plataforma de host para os testes de integração.
//!
//! Cada thread de teste é uma "tarefa" com id próprio e roda numa "CPU"
//! escolhida com [`on_cpu`] (padrão: CPU 0). Interrupções são só um flag
//! por thread.

#![allow(dead_code)]

use std::cell::Cell;
use std::sync::atomic::{AtomicUsize, Ordering};

use forge_shard::hal::{self, CpuOps, SchedOps};
use forge_shard::kcore::logging::{self, LogSink};

static NEXT_TASK: AtomicUsize = AtomicUsize::new(1);

thread_local! {
    static CPU: Cell<usize> = const { Cell::new(0) };
    static IRQ_ON: Cell<bool> = const { Cell::new(true) };
    static TASK: usize = NEXT_TASK.fetch_add(1, Ordering::Relaxed);
}

struct HostCpu;

impl CpuOps for HostCpu {
    fn id(&self) -> usize {
        CPU.with(Cell::get)
    }

    fn interrupts_enabled(&self) -> bool {
        IRQ_ON.with(Cell::get)
    }

    fn disable_interrupts(&self) {
        IRQ_ON.with(|c| c.set(false));
    }

    fn enable_interrupts(&self) {
        IRQ_ON.with(|c| c.set(true));
    }
}

struct HostSched;

impl SchedOps for HostSched {
    fn current_task(&self) -> usize {
        TASK.with(|t| *t)
    }

    fn yield_now(&self) {
        std::thread::yield_now();
    }
}

struct Stderr;

impl LogSink for Stderr {
    fn write(&self, prefix: &str, msg: &str, val: Option<u64>) {
        match val {
            Some(v) => eprintln!("{prefix}{msg}{v:#x}"),
            None => eprintln!("{prefix}{msg}"),
        }
    }
}

static HOST_CPU: HostCpu = HostCpu;
static HOST_SCHED: HostSched = HostSched;
static STDERR: Stderr = Stderr;

/// Instala a plataforma de host (idempotente).
pub fn setup() {
    hal::install(&HOST_CPU, &HOST_SCHED);
    logging::install_sink(&STDERR);
}

/// Faz a thread atual rodar como a CPU `id`.
pub fn on_cpu(id: usize) {
    CPU.with(|c| c.set(id));
}

/// Interrupções da thread atual estão habilitadas?
pub fn irq_enabled() -> bool {
    IRQ_ON.with(Cell::get)
}
