//! Tipos de Erro do Subsistema de Memória
//!
//! Define erros estruturados para diagnóstico preciso de falhas no PMM.
//! Os caminhos que violam o protocolo (free inválido, double free) viram
//! halt via [`kfatal!`](crate::kfatal); estes valores só chegam a quem chama
//! nas APIs de validação e construção.

/// Erros do subsistema de memória
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MmError {
    /// Sem memória física disponível (OOM)
    OutOfMemory,
    /// Endereço não alinhado a página
    NotAligned,
    /// Endereço fora do intervalo gerenciado
    InvalidAddress,
    /// Double free detectado
    DoubleFree,
    /// Parâmetro inválido (CPU inexistente, layout vazio, ...)
    InvalidParameter,
    /// Falha na inicialização (pool global já inicializado)
    InitFailed,
}

impl MmError {
    /// Retorna descrição legível do erro
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OutOfMemory => "OOM: sem páginas físicas disponíveis",
            Self::NotAligned => "Endereço não alinhado a página",
            Self::InvalidAddress => "Endereço fora do intervalo do PMM",
            Self::DoubleFree => "Double free detectado",
            Self::InvalidParameter => "Parâmetro inválido",
            Self::InitFailed => "Falha na inicialização",
        }
    }
}

impl core::fmt::Display for MmError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Tipo Result específico para operações de memória
pub type MmResult<T> = Result<T, MmError>;
