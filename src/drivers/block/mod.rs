//! # Dispositivos de Bloco
//!
//! | Driver      | Descrição                                  |
//! |-------------|--------------------------------------------|
//! | Ramdisk     | Disco em memória (boot, testes)            |
//!
//! Drivers de hardware (ATA, VirtIO) vivem no kernel e entram aqui
//! registrando um `Arc<dyn BlockDevice>` na [`DeviceTable`].

pub mod ramdisk;
pub mod traits;

pub use ramdisk::RamDisk;
pub use traits::{BlockDevice, BlockError};

use alloc::sync::Arc;
use alloc::vec::Vec;
use spin::Once;

use crate::sync::Spinlock;

/// Tabela de dispositivos: o número do dispositivo é o índice.
pub struct DeviceTable {
    devices: Spinlock<Vec<Option<Arc<dyn BlockDevice>>>>,
}

impl DeviceTable {
    pub const fn new() -> Self {
        Self {
            devices: Spinlock::named("devtab", Vec::new()),
        }
    }

    /// Registra um dispositivo no próximo número livre e devolve o número.
    pub fn register(&self, device: Arc<dyn BlockDevice>) -> u32 {
        let mut devs = self.devices.lock();
        let dev = match devs.iter().position(Option::is_none) {
            Some(i) => {
                devs[i] = Some(device);
                i
            }
            None => {
                devs.push(Some(device));
                devs.len() - 1
            }
        };
        crate::kinfo!("(Block) Dispositivo registrado, dev=", dev);
        dev as u32
    }

    /// Registra um dispositivo num número fixo (substitui o anterior).
    pub fn insert(&self, dev: u32, device: Arc<dyn BlockDevice>) {
        let mut devs = self.devices.lock();
        let idx = dev as usize;
        if devs.len() <= idx {
            devs.resize_with(idx + 1, || None);
        }
        devs[idx] = Some(device);
    }

    /// Remove um dispositivo da tabela.
    pub fn remove(&self, dev: u32) -> Option<Arc<dyn BlockDevice>> {
        self.devices.lock().get_mut(dev as usize).and_then(Option::take)
    }

    /// Obtém um dispositivo pelo número
    pub fn get(&self, dev: u32) -> Option<Arc<dyn BlockDevice>> {
        self.devices.lock().get(dev as usize).and_then(Option::clone)
    }

    /// Número de dispositivos registrados
    pub fn count(&self) -> usize {
        self.devices.lock().iter().filter(|d| d.is_some()).count()
    }
}

impl Default for DeviceTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Tabela global de dispositivos de bloco
static BLOCK_DEVICES: Once<Arc<DeviceTable>> = Once::new();

/// Tabela global (criada no primeiro uso)
pub fn devices() -> Arc<DeviceTable> {
    Arc::clone(BLOCK_DEVICES.call_once(|| Arc::new(DeviceTable::new())))
}

/// Registra um dispositivo na tabela global
pub fn register_device(device: Arc<dyn BlockDevice>) -> u32 {
    devices().register(device)
}

/// Obtém um dispositivo da tabela global
pub fn get_device(dev: u32) -> Option<Arc<dyn BlockDevice>> {
    devices().get(dev)
}
