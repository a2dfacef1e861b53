//! One-byte persistence slot over a shared [`StoragePort`].
//!
//! Both tanks keep their checkpoint in the same store under different
//! keys, so the store is shared through `Rc<RefCell<_>>` the same way the
//! control thread shares everything else.

use std::cell::RefCell;
use std::rc::Rc;

use crate::app::ports::{PersistSlot, StorageError, StoragePort};

const SLOT_NAMESPACE: &str = "tankphase";

pub struct NvsSlot<S: StoragePort> {
    store: Rc<RefCell<S>>,
    key: &'static str,
}

impl<S: StoragePort> NvsSlot<S> {
    pub fn new(store: Rc<RefCell<S>>, key: &'static str) -> Self {
        Self { store, key }
    }

    pub fn key(&self) -> &'static str {
        self.key
    }
}

impl<S: StoragePort> PersistSlot for NvsSlot<S> {
    fn save(&mut self, value: u8) -> Result<(), StorageError> {
        self.store.borrow_mut().write(SLOT_NAMESPACE, self.key, &[value])
    }

    fn read(&mut self) -> Result<u8, StorageError> {
        let mut buf = [0u8; 1];
        match self.store.borrow().read(SLOT_NAMESPACE, self.key, &mut buf)? {
            1 => Ok(buf[0]),
            // A zero-length value is a torn write.
            _ => Err(StorageError::IoError),
        }
    }
}
