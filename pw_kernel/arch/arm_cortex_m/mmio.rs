// Copyright 2025 The Pigweed Authors
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not
// use this file except in compliance with the License. You may obtain a copy of
// the License at
//
//     https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS, WITHOUT
// WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied. See the
// License for the specific language governing permissions and limitations under
// the License.

use core::sync::atomic::{AtomicBool, Ordering};

use regs::RegisterAccess;

static TAKEN: AtomicBool = AtomicBool::new(false);

/// Volatile access to the processor's memory mapped registers.
///
/// The register file is a process wide resource, so at most one `Mmio`
/// is handed out by [`Mmio::take`].
pub struct Mmio {
    _private: (),
}

impl Mmio {
    /// Returns the register accessor the first time it is called and `None`
    /// afterwards.
    pub fn take() -> Option<Self> {
        if TAKEN.swap(true, Ordering::AcqRel) {
            None
        } else {
            Some(Self { _private: () })
        }
    }

    /// Create an accessor regardless of whether one is already live.
    ///
    /// # Safety
    /// The caller must ensure no other code reconfigures the registers
    /// reached through this accessor.  Fault handlers use it to read
    /// status after the boot sequence has handed off.
    pub unsafe fn steal() -> Self {
        TAKEN.store(true, Ordering::Release);
        Self { _private: () }
    }
}

impl RegisterAccess for Mmio {
    #[inline]
    fn read_u32(&self, addr: usize) -> u32 {
        // SAFETY: Register descriptors only name aligned, architecturally
        // defined System Control Space addresses.
        unsafe { core::ptr::read_volatile(addr as *const u32) }
    }

    #[inline]
    fn write_u32(&mut self, addr: usize, val: u32) {
        // SAFETY: See `read_u32`.
        unsafe { core::ptr::write_volatile(addr as *mut u32, val) }
    }

    #[inline]
    fn dsb(&mut self) {
        #[cfg(target_os = "none")]
        cortex_m::asm::dsb();
        #[cfg(not(target_os = "none"))]
        core::sync::atomic::fence(Ordering::SeqCst);
    }

    #[inline]
    fn isb(&mut self) {
        #[cfg(target_os = "none")]
        cortex_m::asm::isb();
        #[cfg(not(target_os = "none"))]
        core::sync::atomic::compiler_fence(Ordering::SeqCst);
    }
}
