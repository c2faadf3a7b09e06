use std::cell::Cell;

/// Single-slot lock for one operation on a single-threaded executor.
#[derive(Debug, Default)]
pub struct InFlight {
    active: Cell<bool>,
}

impl InFlight {
    /// Returns `None` while another holder is still running.
    pub fn try_acquire(&self) -> Option<InFlightGuard<'_>> {
        if self.active.replace(true) {
            return None;
        }
        Some(InFlightGuard {
            active: &self.active,
        })
    }

    pub fn is_active(&self) -> bool {
        self.active.get()
    }
}

/// Releases the slot on drop, including when the holding future is dropped.
#[derive(Debug)]
pub struct InFlightGuard<'a> {
    active: &'a Cell<bool>,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.active.set(false);
    }
}
