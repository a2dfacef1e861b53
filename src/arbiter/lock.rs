//! Non-blocking single-holder lock for the shared process line.
//!
//! This is logical arbitration between two cycles that run on the same
//! thread, not a memory-safety primitive.  A caller that gets
//! [`LockError::AlreadyHeld`] re-evaluates on a later event; nothing
//! ever waits.
//!
//! Release requires the [`LockToken`] handed out by `try_acquire`, so a
//! cycle that never acquired the lock cannot clear it.

use core::cell::Cell;
use core::fmt;
use core::sync::atomic::{AtomicU32, Ordering};

use log::{debug, warn};

static NEXT_LOCK_ID: AtomicU32 = AtomicU32::new(1);

/// Proof of holding an [`ExclusivityLock`].  Not `Clone`: exactly one
/// exists per successful acquire.
#[derive(Debug, PartialEq, Eq)]
pub struct LockToken {
    lock_id: u32,
}

impl LockToken {
    pub fn lock_id(&self) -> u32 {
        self.lock_id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockError {
    /// Another holder has the lock.
    AlreadyHeld,
    /// The token was issued by a different lock.
    ForeignToken,
}

impl fmt::Display for LockError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyHeld => write!(f, "already held"),
            Self::ForeignToken => write!(f, "token belongs to another lock"),
        }
    }
}

#[derive(Debug)]
pub struct ExclusivityLock {
    name: &'static str,
    id: u32,
    held: Cell<bool>,
}

impl ExclusivityLock {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            id: NEXT_LOCK_ID.fetch_add(1, Ordering::Relaxed),
            held: Cell::new(false),
        }
    }

    pub fn try_acquire(&self) -> Result<LockToken, LockError> {
        if self.held.get() {
            return Err(LockError::AlreadyHeld);
        }
        self.held.set(true);
        debug!("{}: acquired", self.name);
        Ok(LockToken { lock_id: self.id })
    }

    pub fn release(&self, token: LockToken) -> Result<(), LockError> {
        if token.lock_id != self.id {
            warn!("{}: refusing release with token of lock #{}", self.name, token.lock_id);
            return Err(LockError::ForeignToken);
        }
        self.held.set(false);
        debug!("{}: released", self.name);
        Ok(())
    }

    pub fn is_held(&self) -> bool {
        self.held.get()
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}
