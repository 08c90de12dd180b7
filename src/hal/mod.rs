//! Hardware Abstraction Layer (HAL)
//!
//! Ponte entre os pools e o resto do kernel. O PMM e o buffer cache não
//! sabem em qual CPU rodam nem como o scheduler troca de tarefa: tudo passa
//! pelos traits [`CpuOps`] e [`SchedOps`], instalados uma única vez no boot
//! com [`install`].
//!
//! Antes da instalação valem implementações neutras: CPU 0 sem controle de
//! interrupções e uma "tarefa" única que espera girando.

pub mod irq;
pub mod traits;

pub use irq::{pop_off, push_off};
pub use traits::*;

use spin::Once;

struct Platform {
    cpu: &'static dyn CpuOps,
    sched: &'static dyn SchedOps,
}

static PLATFORM: Once<Platform> = Once::new();

/// CPU neutra usada antes do boot instalar a plataforma real.
struct BootCpu;

impl CpuOps for BootCpu {
    fn id(&self) -> usize {
        0
    }

    fn interrupts_enabled(&self) -> bool {
        false
    }

    fn disable_interrupts(&self) {}

    fn enable_interrupts(&self) {}
}

/// Scheduler neutro: uma tarefa só, espera com spin.
struct BootSched;

impl SchedOps for BootSched {
    fn current_task(&self) -> usize {
        1
    }

    fn yield_now(&self) {
        core::hint::spin_loop();
    }
}

static BOOT_CPU: BootCpu = BootCpu;
static BOOT_SCHED: BootSched = BootSched;

/// Instala CPU e scheduler da plataforma.
///
/// Só a primeira chamada tem efeito. Retorna `false` se a plataforma já
/// estava instalada.
pub fn install(cpu: &'static dyn CpuOps, sched: &'static dyn SchedOps) -> bool {
    let mut installed = false;
    PLATFORM.call_once(|| {
        installed = true;
        Platform { cpu, sched }
    });
    if installed {
        crate::kinfo!("(HAL) Plataforma instalada");
    }
    installed
}

/// CPU da plataforma (ou a CPU de boot).
#[inline]
pub fn cpu() -> &'static dyn CpuOps {
    match PLATFORM.get() {
        Some(p) => p.cpu,
        None => &BOOT_CPU,
    }
}

/// Scheduler da plataforma (ou o scheduler de boot).
#[inline]
pub fn sched() -> &'static dyn SchedOps {
    match PLATFORM.get() {
        Some(p) => p.sched,
        None => &BOOT_SCHED,
    }
}
