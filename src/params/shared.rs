use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;

use super::{ParamAddress, DEFAULTS, KERNEL_PARAM_COUNT};

/*
Lock-Free Parameter Handoff
===========================

The control thread and the render thread never share a lock. Each kernel
parameter has one cell holding:

    value     the pending value, an f32 stored bit-cast in an AtomicU32
    changed   a flag the render thread claims at block boundaries

The writer stores the value first, then raises the flag with Release; the
reader claims the flag with Acquire before loading the value, so a raised
flag always observes the value that raised it. If the writer stores twice
before the reader looks, the older value is simply lost - last write wins,
which is exactly what a knob should do.

The render thread claims flags only at block starts. Mid-block parameter
changes travel through timestamped render events instead, which is what
keeps them sample-accurate.
*/

/// f32 stored bit-cast in an `AtomicU32`.
#[derive(Debug)]
pub struct AtomicF32(AtomicU32);

impl AtomicF32 {
    pub fn new(value: f32) -> Self {
        Self(AtomicU32::new(value.to_bits()))
    }

    #[inline]
    pub fn store(&self, value: f32, ordering: Ordering) {
        self.0.store(value.to_bits(), ordering);
    }

    #[inline]
    pub fn load(&self, ordering: Ordering) -> f32 {
        f32::from_bits(self.0.load(ordering))
    }
}

#[derive(Debug)]
struct ParamCell {
    value: AtomicF32,
    changed: AtomicBool,
}

impl ParamCell {
    fn new(value: f32) -> Self {
        Self {
            value: AtomicF32::new(value),
            changed: AtomicBool::new(false),
        }
    }
}

/// One atomic cell per kernel parameter. Created by the kernel, shared
/// with the control thread through [`ParamHandle`].
#[derive(Debug)]
pub struct SharedParams {
    cells: [ParamCell; KERNEL_PARAM_COUNT],
}

impl SharedParams {
    pub fn with_defaults() -> Self {
        Self {
            cells: [
                ParamCell::new(DEFAULTS[0]),
                ParamCell::new(DEFAULTS[1]),
                ParamCell::new(DEFAULTS[2]),
                ParamCell::new(DEFAULTS[3]),
                ParamCell::new(DEFAULTS[4]),
                ParamCell::new(DEFAULTS[5]),
            ],
        }
    }

    fn cell(&self, address: ParamAddress) -> Option<&ParamCell> {
        let index = address.as_raw() as usize;
        self.cells.get(index)
    }

    /// Store a pending value (internal units) and raise the changed flag.
    pub fn store(&self, address: ParamAddress, value: f32) {
        if let Some(cell) = self.cell(address) {
            cell.value.store(value, Ordering::Release);
            cell.changed.store(true, Ordering::Release);
        }
    }

    /// Read the pending value (internal units) without claiming it.
    pub fn load(&self, address: ParamAddress) -> f32 {
        self.cell(address)
            .map(|cell| cell.value.load(Ordering::Acquire))
            .unwrap_or(0.0)
    }

    /// Claim a pending change: returns the new value if the changed flag
    /// was raised since the last claim, clearing the flag.
    pub fn take_changed(&self, address: ParamAddress) -> Option<f32> {
        let cell = self.cell(address)?;
        if cell.changed.swap(false, Ordering::Acquire) {
            Some(cell.value.load(Ordering::Acquire))
        } else {
            None
        }
    }
}

/// Clone-able control-thread handle to the kernel's parameter cells.
/// Values cross this boundary in host units (percent for the mix
/// parameters, Hz for the rate, 0/1 for switches).
#[derive(Debug, Clone)]
pub struct ParamHandle {
    shared: Arc<SharedParams>,
}

impl ParamHandle {
    pub(crate) fn new(shared: Arc<SharedParams>) -> Self {
        Self { shared }
    }

    /// Schedule a pending parameter change. Visible to the render thread
    /// no later than its next block boundary. `Bypass` has no pending
    /// cell and is ignored here; drive it through a render event.
    pub fn set(&self, address: ParamAddress, external_value: f32) {
        if address == ParamAddress::Bypass {
            return;
        }
        self.shared.store(address, address.to_internal(external_value));
    }

    /// Set by raw host address; unknown addresses are silently ignored.
    pub fn set_raw(&self, raw_address: u64, external_value: f32) {
        if let Some(address) = ParamAddress::from_raw(raw_address) {
            self.set(address, external_value);
        }
    }

    /// Read the pending value. Unknown or cell-less addresses read 0.
    pub fn get(&self, address: ParamAddress) -> f32 {
        if address == ParamAddress::Bypass {
            return 0.0;
        }
        address.to_external(self.shared.load(address))
    }

    /// Read by raw host address; unknown addresses read 0.
    pub fn get_raw(&self, raw_address: u64) -> f32 {
        ParamAddress::from_raw(raw_address)
            .map(|address| self.get(address))
            .unwrap_or(0.0)
    }
}
