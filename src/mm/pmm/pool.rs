//! # Pool de páginas particionado por CPU
//!
//! Cada CPU tem sua free list ([`PageShard`]) com lock próprio. O caminho
//! comum (`alloc_on`/`free_on`) toca só o shard local.
//!
//! Quando a lista local esvazia, a CPU procura (sem lock) o shard com mais
//! páginas livres e rouba metade dele, arredondando para cima:
//!
//! ```text
//! CPU 1 vazia, CPU 0 com 8:
//!   lock(0) -> lock(1)         // ordem crescente de índice
//!   split_front(0, 4) -> splice_front(1)
//!   unlock(1) -> unlock(0)     // ordem inversa
//!   pop(1)
//! ```
//!
//! Se o maior shard tem zero páginas, a alocação falha para o sistema todo.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use super::frame::{Page, PageFrame};
use super::region::{MemLayout, PoolConfig, PoolFlags};
use super::shard::{PageShard, NIL};
use super::stats::PoolStats;
use crate::mm::addr::PhysAddr;
use crate::mm::config::{PAGE_FILL_ALLOC, PAGE_FILL_FREE, PAGE_SIZE};
use crate::mm::error::{MmError, MmResult};
use crate::sync::lock_pair;

/// Alocador de páginas físicas com uma free list por CPU.
pub struct PagePool {
    shards: Box<[PageShard]>,
    frames: Box<[PageFrame]>,
    /// Elos da free list (índice do próximo frame livre)
    next: Box<[AtomicU32]>,
    /// Frame está com algum dono?
    in_use: Box<[AtomicBool]>,
    base: PhysAddr,
    flags: PoolFlags,
    stats: PoolStats,
}

impl PagePool {
    /// Cria o pool e distribui as páginas entre as CPUs online.
    ///
    /// As páginas são divididas igualmente; a última CPU online recebe também
    /// o resto. CPUs offline começam vazias. Sem nenhuma CPU online, todas as
    /// páginas começam alocadas e entram depois via [`free_range`](Self::free_range).
    pub fn new(layout: MemLayout, config: PoolConfig) -> MmResult<Self> {
        config.validate()?;
        let pages = layout.validate()?;

        let shards: Box<[PageShard]> = (0..config.ncpu).map(|_| PageShard::new()).collect();
        let frames: Box<[PageFrame]> = (0..pages).map(|_| PageFrame::new()).collect();
        let next: Box<[AtomicU32]> = (0..pages).map(|_| AtomicU32::new(NIL)).collect();
        let in_use: Box<[AtomicBool]> = (0..pages).map(|_| AtomicBool::new(true)).collect();

        let pool = Self {
            shards,
            frames,
            next,
            in_use,
            base: layout.first_page(),
            flags: config.flags,
            stats: PoolStats::new(pages),
        };

        let online: Vec<usize> = (0..config.ncpu).filter(|&c| config.is_online(c)).collect();
        if let Some(&last) = online.last() {
            let per_cpu = pages / online.len();
            let mut idx = 0;
            for &cpu in &online {
                let end = if cpu == last { pages } else { idx + per_cpu };
                for i in idx..end {
                    pool.in_use[i].store(false, Ordering::Relaxed);
                    pool.release(cpu, i);
                }
                idx = end;
            }
        } else {
            crate::kwarn!("(PMM) Nenhuma CPU online, páginas aguardam free_range");
        }

        crate::kinfo!("(PMM) Páginas gerenciadas=", pages);
        crate::kinfo!("(PMM) Shards (CPUs)=", config.ncpu);
        Ok(pool)
    }

    // =========================================================================
    // ALOCAÇÃO
    // =========================================================================

    /// Aloca uma página na CPU `cpu`, roubando de outra se a local esvaziou.
    ///
    /// Retorna `None` só quando todas as listas estão vazias.
    pub fn alloc_on(&self, cpu: usize) -> Option<Page> {
        let shard = self.shard(cpu);

        loop {
            {
                let mut list = shard.list.lock();
                if let Some(idx) = list.pop(&self.next) {
                    shard.publish(&list);
                    drop(list);
                    return Some(self.hand_out(idx as usize));
                }
            }

            if !self.steal(cpu) {
                self.stats.inc_failed();
                crate::kwarn!("(PMM) OOM: todas as listas vazias, cpu=", cpu);
                return None;
            }
        }
    }

    /// Move metade (arredondando para cima) das páginas do shard mais cheio
    /// para `cpu`.
    ///
    /// Retorna `false` se não há página livre em nenhum shard. `true` não
    /// garante que algo foi movido: outra CPU pode ter esvaziado o doador
    /// entre a varredura e o lock, e quem chama simplesmente tenta de novo.
    fn steal(&self, cpu: usize) -> bool {
        let (donor, max) = self
            .shards
            .iter()
            .enumerate()
            .map(|(i, s)| (i, s.free_count()))
            .fold((cpu, 0), |best, cur| if cur.1 > best.1 { cur } else { best });

        if max == 0 {
            return false;
        }
        if donor == cpu {
            // Alguém devolveu páginas para nós nesse meio tempo
            return true;
        }

        let mut pair = lock_pair(&self.shards[cpu].list, cpu, &self.shards[donor].list, donor);
        let (local, remote) = pair.both();

        let half = (remote.len() + 1) / 2;
        if let Some(chain) = remote.split_front(&self.next, half) {
            local.splice_front(&self.next, chain);
            self.shards[cpu].publish(local);
            self.shards[donor].publish(remote);
            self.stats.record_steal(chain.len);
            crate::kdebug!("(PMM) Roubo: páginas movidas=", chain.len);
            crate::kdebug!("(PMM) Roubo: doador=", donor);
        }
        true
    }

    /// Entrega o frame `idx` recém-retirado de uma lista.
    fn hand_out(&self, idx: usize) -> Page {
        if self.in_use[idx].swap(true, Ordering::AcqRel) {
            crate::kfatal!("(PMM) Página livre já tinha dono, idx=", idx);
        }
        if self.flags.contains(PoolFlags::POISON_ON_ALLOC) {
            // SAFETY: o frame saiu da lista e ainda não tem outro dono.
            unsafe { self.frames[idx].fill(PAGE_FILL_ALLOC) };
        }
        self.stats.inc_alloc();

        let addr = self.addr_of(idx);
        crate::ktrace!("(PMM) alloc=", addr.as_u64());
        Page::new(addr)
    }

    // =========================================================================
    // LIBERAÇÃO
    // =========================================================================

    /// Devolve `page` à lista da CPU `cpu`.
    ///
    /// Endereço desalinhado, fora da região ou página já livre é fatal.
    pub fn free_on(&self, cpu: usize, page: Page) {
        let addr = page.addr();
        let idx = match self.check_free(&page) {
            Ok(idx) => idx,
            Err(e) => crate::kfatal!(e.as_str(), addr.as_u64()),
        };

        if !self.in_use[idx].swap(false, Ordering::AcqRel) {
            crate::kfatal!(MmError::DoubleFree.as_str(), addr.as_u64());
        }

        crate::ktrace!("(PMM) free=", addr.as_u64());
        self.release(cpu, idx);
        self.stats.inc_free();
    }

    /// Valida uma página antes da liberação, sem efeitos colaterais.
    ///
    /// Retorna o índice do frame.
    pub fn check_free(&self, page: &Page) -> MmResult<usize> {
        let addr = page.addr();
        if !addr.is_page_aligned() {
            return Err(MmError::NotAligned);
        }
        let idx = self.index_of(addr).ok_or(MmError::InvalidAddress)?;
        if !self.in_use[idx].load(Ordering::Acquire) {
            return Err(MmError::DoubleFree);
        }
        Ok(idx)
    }

    /// Entrega a faixa `[start, end)` à lista da CPU `cpu`.
    ///
    /// `start` é arredondado para cima até a página; só páginas inteiras
    /// entram.
    ///
    /// # Safety
    /// Nenhuma página da faixa pode ter dono: elas passam a ser do pool.
    pub unsafe fn free_range(&self, cpu: usize, start: PhysAddr, end: PhysAddr) -> usize {
        let mut addr = start.align_up(PAGE_SIZE as u64);
        let mut freed = 0;
        while addr.as_u64() + PAGE_SIZE as u64 <= end.as_u64() {
            self.free_on(cpu, Page::from_addr(addr));
            addr = addr.add(PAGE_SIZE as u64);
            freed += 1;
        }
        crate::kdebug!("(PMM) free_range: páginas=", freed);
        freed
    }

    /// Envenena e liga o frame `idx` na lista de `cpu`.
    fn release(&self, cpu: usize, idx: usize) {
        if self.flags.contains(PoolFlags::POISON_ON_FREE) {
            // SAFETY: o dono abriu mão do frame e ele ainda não está em lista.
            unsafe { self.frames[idx].fill(PAGE_FILL_FREE) };
        }

        let shard = self.shard(cpu);
        let mut list = shard.list.lock();
        list.push(&self.next, idx as u32);
        shard.publish(&list);
    }

    // =========================================================================
    // CONTEÚDO
    // =========================================================================

    /// Conteúdo de uma página alocada.
    pub fn bytes<'a>(&'a self, page: &'a Page) -> &'a [u8; PAGE_SIZE] {
        let idx = self.owned_index(page);
        // SAFETY: `page` é o único dono do frame; só leitura.
        unsafe { self.frames[idx].bytes() }
    }

    /// Conteúdo mutável de uma página alocada.
    pub fn bytes_mut<'a>(&'a self, page: &'a mut Page) -> &'a mut [u8; PAGE_SIZE] {
        let idx = self.owned_index(page);
        // SAFETY: `&mut Page` prova acesso exclusivo ao frame.
        unsafe { self.frames[idx].bytes_mut() }
    }

    fn owned_index(&self, page: &Page) -> usize {
        match self.index_of(page.addr()) {
            Some(idx) if self.in_use[idx].load(Ordering::Acquire) => idx,
            _ => crate::kfatal!("(PMM) Página não pertence ao pool=", page.addr().as_u64()),
        }
    }

    // =========================================================================
    // ENDEREÇOS E INTROSPECÇÃO
    // =========================================================================

    fn shard(&self, cpu: usize) -> &PageShard {
        match self.shards.get(cpu) {
            Some(s) => s,
            None => crate::kfatal!("(PMM) CPU inexistente=", cpu),
        }
    }

    fn addr_of(&self, idx: usize) -> PhysAddr {
        self.base.add((idx * PAGE_SIZE) as u64)
    }

    fn index_of(&self, addr: PhysAddr) -> Option<usize> {
        let off = addr.offset_from(self.base)? as usize;
        let idx = off / PAGE_SIZE;
        (idx < self.frames.len()).then_some(idx)
    }

    /// Endereço pertence à região gerenciada?
    pub fn contains(&self, addr: PhysAddr) -> bool {
        self.index_of(addr).is_some()
    }

    /// Primeira página gerenciada
    pub fn base(&self) -> PhysAddr {
        self.base
    }

    /// Número de CPUs (shards)
    pub fn ncpu(&self) -> usize {
        self.shards.len()
    }

    pub fn total_pages(&self) -> usize {
        self.frames.len()
    }

    /// Soma (sem lock) das páginas livres de todos os shards
    pub fn free_pages(&self) -> usize {
        self.shards.iter().map(PageShard::free_count).sum()
    }

    /// Páginas livres por CPU (leitura sem lock)
    pub fn shard_free_counts(&self) -> Vec<usize> {
        self.shards.iter().map(PageShard::free_count).collect()
    }

    pub fn flags(&self) -> PoolFlags {
        self.flags
    }

    pub fn stats(&self) -> &PoolStats {
        &self.stats
    }
}
