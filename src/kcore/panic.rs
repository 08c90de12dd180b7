//! Caminho Fatal.
//!
//! Violações de protocolo (liberar página inválida, escrever buffer sem o
//! lock de conteúdo) e exaustão total do buffer cache não têm recuperação
//! neste nível. O erro é registrado na serial via `kerror!` e a execução do
//! core é interrompida com `panic!`; o `#[panic_handler]` do binário do
//! kernel desabilita interrupções e trava a CPU.

/// Interrompe o core atual. Nunca retorna.
#[cold]
#[inline(never)]
#[track_caller]
pub fn fatal(msg: &'static str) -> ! {
    crate::kerror!("================ KERNEL FATAL ================");
    crate::kerror!(msg);
    panic!("{}", msg)
}

/// Interrompe o core atual com valor de diagnóstico.
#[cold]
#[inline(never)]
#[track_caller]
pub fn fatal_with(msg: &'static str, val: u64) -> ! {
    crate::kerror!("================ KERNEL FATAL ================");
    crate::kerror!(msg, val);
    panic!("{}{:#x}", msg, val)
}

/// kfatal! - registra e interrompe o core.
///
/// ```ignore
/// kfatal!("(PMM) free: endereço desalinhado=", addr);
/// ```
#[macro_export]
macro_rules! kfatal {
    ($msg:expr) => {
        $crate::kcore::panic::fatal($msg)
    };
    ($msg:expr, $val:expr) => {
        $crate::kcore::panic::fatal_with($msg, $val as u64)
    };
}
