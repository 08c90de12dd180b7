// =============================================================================
// KERNEL LOGGING SYSTEM - ZERO OVERHEAD
// =============================================================================
//
// Sistema de logging dos pools do Forge com custo ZERO em release.
//
// ARQUITETURA:
// - Usa features do Cargo para compile-time filtering
// - Com feature "no_logs", TODOS os macros viram expressões vazias
// - SEM core::fmt no caminho quente - apenas strings literais + hex
// - SEM alocação
// - A saída vai para um LogSink instalado pelo kernel (serial, buffer, ...)
//   Antes da instalação os registros são descartados.
//
// NÍVEIS DE LOG (do mais crítico ao menos):
// - ERROR: Erros fatais ou críticos
// - WARN:  Situações suspeitas mas recuperáveis
// - INFO:  Fluxo normal de execução
// - DEBUG: Informações de debugging (roubos entre shards)
// - TRACE: Detalhes extremos (cada alocação, cada bget)
//
// COMO USAR:
//   kinfo!("(PMM) Inicializando...");          // Apenas string
//   kinfo!("(PMM) Páginas=", total);           // String + hex
//
// =============================================================================

use spin::Once;

// =============================================================================
// PREFIXOS COM CORES ANSI
// =============================================================================

pub const P_ERROR: &str = "\x1b[1;31m[ERRO]\x1b[0m ";
pub const P_WARN: &str = "\x1b[1;33m[WARN]\x1b[0m ";
pub const P_INFO: &str = "\x1b[32m[INFO]\x1b[0m ";
pub const P_DEBUG: &str = "\x1b[36m[DEBG]\x1b[0m ";
pub const P_TRACE: &str = "\x1b[35m[TRAC]\x1b[0m ";
pub const P_OK: &str = "\x1b[32m[OK]\x1b[0m ";
pub const P_FAIL: &str = "\x1b[1;31m[FAIL]\x1b[0m ";

// =============================================================================
// DESTINO DOS LOGS
// =============================================================================

/// Destino dos registros de log (serial, ring buffer, stderr em testes).
///
/// Cada chamada corresponde a uma linha completa.
pub trait LogSink: Sync {
    fn write(&self, prefix: &str, msg: &str, val: Option<u64>);
}

static SINK: Once<&'static dyn LogSink> = Once::new();

/// Instala o destino dos logs. Só a primeira chamada tem efeito.
pub fn install_sink(sink: &'static dyn LogSink) -> bool {
    let mut installed = false;
    SINK.call_once(|| {
        installed = true;
        sink
    });
    installed
}

/// Emite uma linha (usado pelos macros).
#[inline]
pub fn emit(prefix: &str, msg: &str, val: Option<u64>) {
    if let Some(sink) = SINK.get() {
        sink.write(prefix, msg, val);
    }
}

// =============================================================================
// MACROS DE LOG - NÍVEL ERROR
// =============================================================================

#[cfg(not(feature = "no_logs"))]
#[macro_export]
macro_rules! kerror {
    ($msg:expr) => {{
        $crate::kcore::logging::emit($crate::kcore::logging::P_ERROR, $msg, None);
    }};
    ($msg:expr, $val:expr) => {{
        $crate::kcore::logging::emit($crate::kcore::logging::P_ERROR, $msg, Some($val as u64));
    }};
}

#[cfg(feature = "no_logs")]
#[macro_export]
macro_rules! kerror {
    ($($t:tt)*) => {{}};
}

// =============================================================================
// MACROS DE LOG - NÍVEL WARN
// =============================================================================

#[cfg(not(feature = "no_logs"))]
#[macro_export]
macro_rules! kwarn {
    ($msg:expr) => {{
        $crate::kcore::logging::emit($crate::kcore::logging::P_WARN, $msg, None);
    }};
    ($msg:expr, $val:expr) => {{
        $crate::kcore::logging::emit($crate::kcore::logging::P_WARN, $msg, Some($val as u64));
    }};
}

#[cfg(feature = "no_logs")]
#[macro_export]
macro_rules! kwarn {
    ($($t:tt)*) => {{}};
}

// =============================================================================
// MACROS DE LOG - NÍVEL INFO
// =============================================================================

#[cfg(not(any(feature = "no_logs", feature = "log_error")))]
#[macro_export]
macro_rules! kinfo {
    ($msg:expr) => {{
        $crate::kcore::logging::emit($crate::kcore::logging::P_INFO, $msg, None);
    }};
    ($msg:expr, $val:expr) => {{
        $crate::kcore::logging::emit($crate::kcore::logging::P_INFO, $msg, Some($val as u64));
    }};
}

#[cfg(any(feature = "no_logs", feature = "log_error"))]
#[macro_export]
macro_rules! kinfo {
    ($($t:tt)*) => {{}};
}

// =============================================================================
// MACROS DE LOG - NÍVEL DEBUG
// =============================================================================

#[cfg(all(
    any(feature = "log_debug", feature = "log_trace"),
    not(feature = "no_logs")
))]
#[macro_export]
macro_rules! kdebug {
    ($msg:expr) => {{
        $crate::kcore::logging::emit($crate::kcore::logging::P_DEBUG, $msg, None);
    }};
    ($msg:expr, $val:expr) => {{
        $crate::kcore::logging::emit($crate::kcore::logging::P_DEBUG, $msg, Some($val as u64));
    }};
}

#[cfg(not(all(
    any(feature = "log_debug", feature = "log_trace"),
    not(feature = "no_logs")
)))]
#[macro_export]
macro_rules! kdebug {
    ($($t:tt)*) => {{}};
}

// =============================================================================
// MACROS DE LOG - NÍVEL TRACE
// =============================================================================

#[cfg(all(feature = "log_trace", not(feature = "no_logs")))]
#[macro_export]
macro_rules! ktrace {
    ($msg:expr) => {{
        $crate::kcore::logging::emit($crate::kcore::logging::P_TRACE, $msg, None);
    }};
    ($msg:expr, $val:expr) => {{
        $crate::kcore::logging::emit($crate::kcore::logging::P_TRACE, $msg, Some($val as u64));
    }};
}

#[cfg(not(all(feature = "log_trace", not(feature = "no_logs"))))]
#[macro_export]
macro_rules! ktrace {
    ($($t:tt)*) => {{}};
}

// =============================================================================
// MACROS DE STATUS (OK/FAIL)
// =============================================================================

/// kok! - Log de sucesso (prefixo verde [OK]).
#[cfg(not(feature = "no_logs"))]
#[macro_export]
macro_rules! kok {
    ($msg:expr) => {{
        $crate::kcore::logging::emit($crate::kcore::logging::P_OK, $msg, None);
    }};
}

#[cfg(feature = "no_logs")]
#[macro_export]
macro_rules! kok {
    ($($t:tt)*) => {{}};
}

/// kfail! - Log de falha (prefixo vermelho [FAIL]).
#[cfg(not(feature = "no_logs"))]
#[macro_export]
macro_rules! kfail {
    ($msg:expr) => {{
        $crate::kcore::logging::emit($crate::kcore::logging::P_FAIL, $msg, None);
    }};
}

#[cfg(feature = "no_logs")]
#[macro_export]
macro_rules! kfail {
    ($($t:tt)*) => {{}};
}
