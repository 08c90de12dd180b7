//! # Buffer Cache particionado
//!
//! `nbuf` slots distribuídos em `nshards` shards. O bloco `blockno` só pode
//! estar em cache no shard `blockno % nshards` (shard "casa"), então a busca
//! toca um único lock.
//!
//! Cada shard mantém sua lista em ordem de liberação: frente = liberado mais
//! recentemente, fim = candidato a reciclagem.
//!
//! ## bget
//!
//! ```text
//! lock(casa)
//! ├─ achou (dev, blockno)?  refcnt++, unlock, lock(conteúdo)
//! ├─ livres(casa) == 0?     unlock, roubo, recomeça
//! └─ recicla o slot livre mais ao fim, unlock, lock(conteúdo), lê do disco
//! ```
//!
//! ## Roubo
//!
//! Varre os contadores sem lock e escolhe o shard com mais slots livres.
//! Trava casa e doador em ordem crescente de índice, confere de novo, e
//! move metade (arredondando para cima) dos slots livres do doador, do fim
//! da lista dele para o fim da lista da casa. Slots movidos perdem a
//! identidade. Depois solta tudo e recomeça a busca do zero.

use alloc::boxed::Box;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::sync::atomic::{AtomicUsize, Ordering};

use super::buf::Buf;
use super::config::{CacheConfig, CacheError, BLOCK_SIZE};
use super::shard::CacheShard;
use super::slot::Slot;
use super::stats::CacheStats;
use crate::drivers::block::{BlockDevice, DeviceTable};
use crate::klib::list::LinkTable;
use crate::sync::lock_pair;

pub struct BufferCache {
    slots: Box<[Slot]>,
    links: LinkTable,
    shards: Box<[CacheShard]>,
    /// Soma dos contadores `free` de todos os shards
    free_total: AtomicUsize,
    devices: Arc<DeviceTable>,
    config: CacheConfig,
    stats: CacheStats,
}

impl BufferCache {
    /// Cria o cache. O slot `i` começa livre no shard `i % nshards`.
    pub fn new(config: CacheConfig, devices: Arc<DeviceTable>) -> Result<Self, CacheError> {
        config.validate()?;
        let CacheConfig { nbuf, nshards } = config;

        let links = LinkTable::new(nbuf, nshards);
        let shards: Box<[CacheShard]> = (0..nshards).map(|i| CacheShard::new(links.list(i))).collect();
        let slots: Box<[Slot]> = (0..nbuf).map(|i| Slot::new(i % nshards)).collect();

        for i in 0..nbuf {
            let shard = &shards[i % nshards];
            shard.list.lock().push_front(&links, i as u32);
            shard.add_free(1);
        }

        crate::kinfo!("(BCache) Slots=", nbuf);
        crate::kinfo!("(BCache) Shards=", nshards);

        Ok(Self {
            slots,
            links,
            shards,
            free_total: AtomicUsize::new(nbuf),
            devices,
            config,
            stats: CacheStats::default(),
        })
    }

    // =========================================================================
    // API
    // =========================================================================

    /// Bloco `blockno` do dispositivo `dev`, com o conteúdo travado e válido.
    pub fn read(&self, dev: u32, blockno: u32) -> Buf<'_> {
        let device = self.device(dev);
        let mut buf = self.get(dev, blockno);

        let slot = self.slot(buf.slot_index());
        if !slot.is_valid() {
            let lba = self.lba(&*device, blockno);
            if let Err(e) = device.read_blocks(lba, buf.data_mut()) {
                crate::kfatal!(e.as_str(), blockno);
            }
            slot.set_valid(true);
            CacheStats::inc(&self.stats.reads);
        }
        buf
    }

    /// Grava o conteúdo de `buf` no disco (síncrono).
    pub fn write(&self, buf: &Buf<'_>) {
        let slot = self.slot(buf.slot_index());
        if !slot.content.holding() {
            crate::kfatal!("(BCache) bwrite: lock de conteúdo não pertence à tarefa, slot=", buf.slot());
        }

        let device = self.device(slot.dev());
        let lba = self.lba(&*device, slot.blockno());
        if let Err(e) = device.write_blocks(lba, buf.data()) {
            crate::kfatal!(e.as_str(), slot.blockno());
        }
        CacheStats::inc(&self.stats.writes);
    }

    /// Solta o buffer (mesmo que dropar `buf`).
    pub fn release(&self, buf: Buf<'_>) {
        drop(buf);
    }

    /// Segura o slot além do `Buf` (não pode ser reciclado nem roubado).
    pub fn pin(&self, buf: &Buf<'_>) {
        let slot = self.slot(buf.slot_index());
        let _list = self.shards[slot.shard()].list.lock();
        slot.inc_ref();
    }

    /// Desfaz um [`pin`](Self::pin). Fatal se não houver pin.
    pub fn unpin(&self, buf: &Buf<'_>) {
        let slot = self.slot(buf.slot_index());
        let _list = self.shards[slot.shard()].list.lock();
        if slot.refcnt() <= 1 {
            crate::kfatal!("(BCache) bunpin sem bpin, slot=", buf.slot());
        }
        slot.dec_ref();
    }

    /// Verifica se `dev` está registrado e tem setor compatível.
    pub fn check_device(&self, dev: u32) -> Result<(), CacheError> {
        let device = self.devices.get(dev).ok_or(CacheError::NoDevice)?;
        let bs = device.block_size();
        if bs == 0 || BLOCK_SIZE % bs != 0 {
            return Err(CacheError::InvalidConfig);
        }
        Ok(())
    }

    // =========================================================================
    // BGET
    // =========================================================================

    fn get(&self, dev: u32, blockno: u32) -> Buf<'_> {
        let home = blockno as usize % self.shards.len();
        let shard = &self.shards[home];

        loop {
            let list = shard.list.lock();

            if let Some(idx) = list.iter(&self.links).find(|&i| self.slot(i).is(dev, blockno)) {
                let slot = self.slot(idx);
                if slot.inc_ref() == 0 {
                    shard.sub_free(1);
                    self.free_total.fetch_sub(1, Ordering::Relaxed);
                }
                drop(list);
                CacheStats::inc(&self.stats.hits);
                crate::ktrace!("(BCache) hit, blockno=", blockno);
                return Buf::new(self, idx, slot.content.lock());
            }

            if shard.free_count() == 0 {
                drop(list);
                self.steal(home);
                continue;
            }

            let victim = list.iter_rev(&self.links).find(|&i| self.slot(i).refcnt() == 0);
            let Some(idx) = victim else {
                crate::kfatal!("(BCache) bget: contador livre sem slot livre, shard=", home);
            };
            let slot = self.slot(idx);
            slot.claim(dev, blockno);
            shard.sub_free(1);
            self.free_total.fetch_sub(1, Ordering::Relaxed);
            drop(list);

            CacheStats::inc(&self.stats.misses);
            crate::ktrace!("(BCache) miss, blockno=", blockno);
            return Buf::new(self, idx, slot.content.lock());
        }
    }

    /// Traz para `home` metade (arredondando para cima) dos slots livres do
    /// shard mais cheio. Fatal se não há slot livre no cache.
    fn steal(&self, home: usize) {
        let (donor, max) = self
            .shards
            .iter()
            .enumerate()
            .map(|(i, s)| (i, s.free_count()))
            .fold((home, 0), |best, cur| if cur.1 > best.1 { cur } else { best });

        if max == 0 {
            // Os contadores por shard podem ser lidos no meio de um roubo
            // alheio; o total não muda com roubos.
            if self.free_total.load(Ordering::Relaxed) == 0 {
                crate::kfatal!("(BCache) Nenhum buffer disponível, shard=", home);
            }
            core::hint::spin_loop();
            return;
        }
        if donor == home {
            return;
        }

        let mut pair = lock_pair(&self.shards[home].list, home, &self.shards[donor].list, donor);
        let (local, remote) = pair.both();

        let donor_free = self.shards[donor].free_count();
        if self.shards[home].free_count() > 0 || donor_free == 0 {
            return;
        }

        let want = (donor_free + 1) / 2;
        let mut moved = 0;
        for idx in remote.iter_rev(&self.links) {
            if moved == want {
                break;
            }
            let slot = self.slot(idx);
            if slot.refcnt() != 0 {
                continue;
            }
            remote.remove(&self.links, idx);
            slot.blank(home);
            local.push_back(&self.links, idx);
            moved += 1;
        }

        self.shards[donor].sub_free(moved);
        self.shards[home].add_free(moved);
        self.stats.record_steal(moved);
        crate::kdebug!("(BCache) Roubo: slots movidos=", moved);
        crate::kdebug!("(BCache) Roubo: doador=", donor);
    }

    /// Solta uma referência; na última o slot vai para a frente da lista.
    pub(super) fn unref(&self, idx: u32) {
        let slot = self.slot(idx);
        let home = slot.shard();
        let shard = &self.shards[home];

        let mut list = shard.list.lock();
        if slot.refcnt() == 0 {
            crate::kfatal!("(BCache) brelse: refcnt já é zero, slot=", idx);
        }
        if slot.dec_ref() == 0 {
            list.move_to_front(&self.links, idx);
            shard.add_free(1);
            self.free_total.fetch_add(1, Ordering::Relaxed);
        }
    }

    // =========================================================================
    // AUXILIARES
    // =========================================================================

    pub(super) fn slot(&self, idx: u32) -> &Slot {
        &self.slots[idx as usize]
    }

    fn device(&self, dev: u32) -> Arc<dyn BlockDevice> {
        match self.devices.get(dev) {
            Some(d) => d,
            None => crate::kfatal!(CacheError::NoDevice.as_str(), dev),
        }
    }

    /// Primeiro setor do bloco `blockno` no dispositivo
    fn lba(&self, device: &dyn BlockDevice, blockno: u32) -> u64 {
        let bs = device.block_size();
        if bs == 0 || BLOCK_SIZE % bs != 0 {
            crate::kfatal!("(BCache) Setor incompatível com BLOCK_SIZE=", bs);
        }
        blockno as u64 * (BLOCK_SIZE / bs) as u64
    }

    // =========================================================================
    // INTROSPECÇÃO
    // =========================================================================

    /// Shard onde o slot está ligado agora
    pub fn slot_shard(&self, slot: usize) -> usize {
        self.slots[slot].shard()
    }

    /// Slots livres por shard (leitura sem lock)
    pub fn shard_free_counts(&self) -> Vec<usize> {
        self.shards.iter().map(CacheShard::free_count).collect()
    }

    pub fn free_slots(&self) -> usize {
        self.free_total.load(Ordering::Relaxed)
    }

    pub fn config(&self) -> CacheConfig {
        self.config
    }

    pub fn nshards(&self) -> usize {
        self.shards.len()
    }

    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drivers::block::RamDisk;

    fn setup(nbuf: usize, nshards: usize) -> (BufferCache, Arc<RamDisk>) {
        let table = Arc::new(DeviceTable::new());
        let disk = Arc::new(RamDisk::new(64, 512));
        table.insert(1, disk.clone());
        let cache = BufferCache::new(CacheConfig::new(nbuf, nshards), table).unwrap();
        (cache, disk)
    }

    #[test]
    fn test_initial_distribution() {
        let (cache, _) = setup(5, 2);
        assert_eq!(cache.shard_free_counts(), [3, 2]);
        assert_eq!(cache.slot_shard(4), 0);
        assert_eq!(cache.slot_shard(3), 1);
    }

    #[test]
    fn test_miss_reads_device_once() {
        let (cache, disk) = setup(4, 1);
        let b = cache.read(1, 7);
        assert_eq!((b.dev(), b.blockno(), b.refcnt()), (1, 7, 1));
        cache.release(b);

        let again = cache.read(1, 7);
        drop(again);
        assert_eq!(disk.reads(), 1);
        assert_eq!(cache.stats().hits(), 1);
        assert_eq!(cache.stats().misses(), 1);
        assert_eq!(cache.free_slots(), 4);
    }

    #[test]
    fn test_write_reaches_device() {
        let (cache, disk) = setup(2, 1);
        let mut b = cache.read(1, 3);
        b.data_mut().fill(0xC3);
        cache.write(&b);
        b.release();

        // Bloco 3 de 1024 bytes = setores 6 e 7
        let mut raw = [0u8; BLOCK_SIZE];
        disk.read_blocks(6, &mut raw).unwrap();
        assert!(raw.iter().all(|&x| x == 0xC3));
        assert_eq!(cache.stats().writes(), 1);
    }

    #[test]
    fn test_lru_recycles_least_recently_released() {
        let (cache, _) = setup(3, 1);
        let b = cache.read(1, 10);
        let a = cache.read(1, 11);
        let c = cache.read(1, 12);
        let slot_b = b.slot();

        b.release();
        a.release();
        c.release();

        let d = cache.read(1, 13);
        assert_eq!(d.slot(), slot_b);
    }

    #[test]
    fn test_pinned_slot_never_recycled() {
        let (cache, _) = setup(2, 1);
        let a = cache.read(1, 0);
        let slot_a = a.slot();
        cache.pin(&a);
        assert_eq!(a.refcnt(), 2);
        a.release();

        for blockno in 1..6 {
            let b = cache.read(1, blockno);
            assert_ne!(b.slot(), slot_a);
        }

        let a = cache.read(1, 0);
        assert_eq!(a.slot(), slot_a);
        cache.unpin(&a);
        assert_eq!(a.refcnt(), 1);
        drop(a);
        assert_eq!(cache.free_slots(), 2);
    }

    #[test]
    fn test_steal_from_fullest_shard() {
        let (cache, _) = setup(4, 2);
        // shard 0 = slots {0, 2}, shard 1 = slots {1, 3}
        let x = cache.read(1, 0);
        let y = cache.read(1, 2);
        assert_eq!(cache.shard_free_counts(), [0, 2]);
        assert_eq!(cache.stats().steals(), 0);

        let z = cache.read(1, 4);
        assert_eq!(cache.stats().steals(), 1);
        assert_eq!(cache.slot_shard(z.slot()), 0);
        assert_eq!(z.slot() % 2, 1, "slot veio do shard 1");
        assert_eq!(cache.shard_free_counts(), [0, 1]);

        drop((x, y, z));
        assert_eq!(cache.shard_free_counts(), [3, 1]);
    }

    #[test]
    #[should_panic]
    fn test_exhaustion_is_fatal() {
        let (cache, _) = setup(2, 1);
        let _a = cache.read(1, 0);
        let _b = cache.read(1, 1);
        let _c = cache.read(1, 2);
    }

    #[test]
    #[should_panic]
    fn test_unpin_without_pin_is_fatal() {
        let (cache, _) = setup(2, 1);
        let a = cache.read(1, 0);
        cache.unpin(&a);
    }

    #[test]
    #[should_panic]
    fn test_unknown_device_is_fatal() {
        let (cache, _) = setup(2, 1);
        let _ = cache.read(9, 0);
    }

    #[test]
    fn test_check_device() {
        let (cache, _) = setup(2, 1);
        assert_eq!(cache.check_device(1), Ok(()));
        assert_eq!(cache.check_device(0), Err(CacheError::NoDevice));
    }
}
