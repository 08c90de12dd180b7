//! # Configuração do Módulo de Memória
//!
//! Define constantes, padrões de veneno e utilitários de alinhamento do PMM.

// =============================================================================
// CONSTANTES DE TAMANHO
// =============================================================================

/// Tamanho de uma página (4 KiB)
pub const PAGE_SIZE: usize = 4096;

// =============================================================================
// CONFIGURAÇÃO SMP
// =============================================================================

/// Número máximo de CPUs suportadas (uma free list por CPU)
pub const MAX_CPUS: usize = 8;

// =============================================================================
// VENENO (DEBUG)
// =============================================================================

/// Byte escrito em páginas liberadas (expõe referências pendentes)
pub const PAGE_FILL_FREE: u8 = 0x01;

/// Byte escrito em páginas recém-alocadas (expõe leitura não inicializada)
pub const PAGE_FILL_ALLOC: u8 = 0x05;

// =============================================================================
// FUNÇÕES UTILITÁRIAS
// =============================================================================

/// Alinha valor para cima ao múltiplo de align
#[inline(always)]
pub const fn align_up(val: usize, align: usize) -> usize {
    (val + align - 1) & !(align - 1)
}

/// Verifica se valor está alinhado
#[inline(always)]
pub const fn is_aligned(val: usize, align: usize) -> bool {
    val & (align - 1) == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_align_helpers() {
        assert_eq!(align_up(4097, PAGE_SIZE), 8192);
        assert_eq!(align_up(4096, PAGE_SIZE), 4096);
        assert!(is_aligned(0x8000, PAGE_SIZE));
        assert!(!is_aligned(0x8001, PAGE_SIZE));
    }
}
