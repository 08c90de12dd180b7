//! Index-linked Doubly Linked List
//!
//! Arquivo: klib/list/index.rs
//!
//! Propósito: Listas duplamente encadeadas por índice sobre uma arena fixa.
//!
//! Detalhes de Implementação:
//! - Os nós são índices (u32) de uma arena externa (ex.: slots do bcache).
//! - `prev`/`next` ficam numa [`LinkTable`] compartilhada por várias listas;
//!   cada lista tem um nó sentinela próprio no fim da tabela.
//! - Um nó pertence a no máximo uma lista. Mover entre listas é O(1).
//! - Quem tem `&mut IndexList` pode tocar os links dos nós daquela lista;
//!   na prática a lista mora dentro do Spinlock do shard dono.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::sync::atomic::{AtomicU32, Ordering};

/// Índice nulo
pub const NIL: u32 = u32::MAX;

/// Tabela de ligações `prev`/`next` para `nodes` nós e `lists` sentinelas.
pub struct LinkTable {
    prev: Box<[AtomicU32]>,
    next: Box<[AtomicU32]>,
    nodes: usize,
}

impl LinkTable {
    /// Cria tabela com `nodes` nós soltos e `lists` sentinelas auto-ligadas.
    pub fn new(nodes: usize, lists: usize) -> Self {
        let total = nodes + lists;
        let mut prev = Vec::with_capacity(total);
        let mut next = Vec::with_capacity(total);
        for i in 0..total {
            let v = if i < nodes { NIL } else { i as u32 };
            prev.push(AtomicU32::new(v));
            next.push(AtomicU32::new(v));
        }
        Self {
            prev: prev.into_boxed_slice(),
            next: next.into_boxed_slice(),
            nodes,
        }
    }

    /// Número de nós (sem sentinelas)
    pub fn nodes(&self) -> usize {
        self.nodes
    }

    /// Cabeça da lista `id`. Cada id deve ser entregue a um único dono.
    pub fn list(&self, id: usize) -> IndexList {
        IndexList {
            sentinel: (self.nodes + id) as u32,
            len: 0,
        }
    }

    #[inline]
    fn prev(&self, i: u32) -> u32 {
        self.prev[i as usize].load(Ordering::Relaxed)
    }

    #[inline]
    fn next(&self, i: u32) -> u32 {
        self.next[i as usize].load(Ordering::Relaxed)
    }

    #[inline]
    fn set_prev(&self, i: u32, v: u32) {
        self.prev[i as usize].store(v, Ordering::Relaxed);
    }

    #[inline]
    fn set_next(&self, i: u32, v: u32) {
        self.next[i as usize].store(v, Ordering::Relaxed);
    }

    /// Liga `node` entre `before` e `after` (vizinhos).
    fn link(&self, node: u32, before: u32, after: u32) {
        self.set_prev(node, before);
        self.set_next(node, after);
        self.set_next(before, node);
        self.set_prev(after, node);
    }
}

/// Lista duplamente encadeada com sentinela, frente = mais recente.
#[derive(Debug)]
pub struct IndexList {
    sentinel: u32,
    len: usize,
}

impl IndexList {
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Insere na frente (MRU)
    pub fn push_front(&mut self, t: &LinkTable, node: u32) {
        debug_assert!((node as usize) < t.nodes);
        let first = t.next(self.sentinel);
        t.link(node, self.sentinel, first);
        self.len += 1;
    }

    /// Insere no fim (LRU)
    pub fn push_back(&mut self, t: &LinkTable, node: u32) {
        debug_assert!((node as usize) < t.nodes);
        let last = t.prev(self.sentinel);
        t.link(node, last, self.sentinel);
        self.len += 1;
    }

    /// Remove `node`, que precisa pertencer a esta lista.
    pub fn remove(&mut self, t: &LinkTable, node: u32) {
        let p = t.prev(node);
        let n = t.next(node);
        t.set_next(p, n);
        t.set_prev(n, p);
        t.set_prev(node, NIL);
        t.set_next(node, NIL);
        self.len -= 1;
    }

    /// Move `node` (já nesta lista) para a frente.
    pub fn move_to_front(&mut self, t: &LinkTable, node: u32) {
        self.remove(t, node);
        self.push_front(t, node);
    }

    pub fn front(&self, t: &LinkTable) -> Option<u32> {
        let n = t.next(self.sentinel);
        (n != self.sentinel).then_some(n)
    }

    pub fn back(&self, t: &LinkTable) -> Option<u32> {
        let p = t.prev(self.sentinel);
        (p != self.sentinel).then_some(p)
    }

    /// Percorre da frente (MRU) para o fim (LRU).
    pub fn iter<'t>(&self, t: &'t LinkTable) -> Iter<'t> {
        Iter {
            table: t,
            sentinel: self.sentinel,
            cur: t.next(self.sentinel),
            forward: true,
        }
    }

    /// Percorre do fim (LRU) para a frente (MRU).
    pub fn iter_rev<'t>(&self, t: &'t LinkTable) -> Iter<'t> {
        Iter {
            table: t,
            sentinel: self.sentinel,
            cur: t.prev(self.sentinel),
            forward: false,
        }
    }
}

/// Iterador sobre índices de uma [`IndexList`].
///
/// O próximo índice é lido antes de devolver o atual: remover o nó recém
/// devolvido é seguro, qualquer outro não.
pub struct Iter<'t> {
    table: &'t LinkTable,
    sentinel: u32,
    cur: u32,
    forward: bool,
}

impl Iterator for Iter<'_> {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        if self.cur == self.sentinel {
            return None;
        }
        let node = self.cur;
        self.cur = if self.forward {
            self.table.next(node)
        } else {
            self.table.prev(node)
        };
        Some(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(list: &IndexList, t: &LinkTable) -> Vec<u32> {
        list.iter(t).collect()
    }

    #[test]
    fn test_push_and_order() {
        let t = LinkTable::new(4, 1);
        let mut l = t.list(0);
        l.push_front(&t, 0);
        l.push_front(&t, 1);
        l.push_back(&t, 2);
        assert_eq!(collect(&l, &t), [1, 0, 2]);
        assert_eq!(l.iter_rev(&t).collect::<Vec<_>>(), [2, 0, 1]);
        assert_eq!(l.front(&t), Some(1));
        assert_eq!(l.back(&t), Some(2));
        assert_eq!(l.len(), 3);
    }

    #[test]
    fn test_move_between_lists() {
        let t = LinkTable::new(4, 2);
        let mut a = t.list(0);
        let mut b = t.list(1);
        for i in 0..4 {
            a.push_front(&t, i);
        }
        a.remove(&t, 0);
        b.push_back(&t, 0);
        a.move_to_front(&t, 1);

        assert_eq!(collect(&a, &t), [1, 3, 2]);
        assert_eq!(collect(&b, &t), [0]);
        a.remove(&t, 1);
        a.remove(&t, 2);
        a.remove(&t, 3);
        assert!(a.is_empty());
        assert_eq!(a.front(&t), None);
    }
}
