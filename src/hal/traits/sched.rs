//! Interface mínima do scheduler vista pelos locks bloqueantes.

/// Operações de scheduler usadas pelo [`SleepLock`](crate::sync::SleepLock).
pub trait SchedOps: Sync {
    /// Identificador da tarefa atual. Nunca zero (zero significa "sem dono").
    fn current_task(&self) -> usize;

    /// Cede a CPU enquanto a tarefa espera um lock de conteúdo.
    ///
    /// Pode retornar a qualquer momento; quem chama sempre revalida a condição.
    fn yield_now(&self);
}
