//! Interface Abstrata de CPU (HAL).
//! Define as operações que qualquer arquitetura deve fornecer aos pools.

/// Operações de CPU usadas pelos locks estruturais.
pub trait CpuOps: Sync {
    /// ID da CPU atual (0..MAX_CPUS).
    fn id(&self) -> usize;

    /// Verifica se as interrupções estão habilitadas.
    fn interrupts_enabled(&self) -> bool;

    /// Desabilita interrupções (CLI). Impede preempção no core atual.
    fn disable_interrupts(&self);

    /// Habilita interrupções (STI).
    fn enable_interrupts(&self);
}
