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

//! Log console.
//!
//! Semihosting traps into the debugger with `BKPT`.  Once `DEMCR.MON_EN` is
//! set without a halting debugger, every such trap is taken as a
//! DebugMonitor exception, so builds that rely on the DebugMonitor
//! watchpoint report disable the `semihosting` feature and log over ITM.

use core::fmt;

use pw_log::{LogLevel, log_level_tag};

#[cfg(feature = "semihosting")]
#[unsafe(no_mangle)]
pub fn pw_log_backend_write(level: LogLevel, args: fmt::Arguments<'_>) {
    cortex_m_semihosting::hprintln!("[{}] {}", log_level_tag(level), args);
}

#[cfg(not(feature = "semihosting"))]
#[unsafe(no_mangle)]
pub fn pw_log_backend_write(level: LogLevel, args: fmt::Arguments<'_>) {
    use cortex_m::peripheral::{ITM, itm};

    const ITM_TCR_ITMENA: u32 = 1 << 0;

    cortex_m::interrupt::free(|_| {
        // SAFETY: Stimulus port 0 is only written here, with interrupts
        // disabled.
        let itm = unsafe { &mut *(ITM::PTR as *mut itm::RegisterBlock) };

        // The trace probe enables the unit and port 0; skip until it has.
        if itm.tcr.read() & ITM_TCR_ITMENA == 0 || itm.ter[0].read() & 1 == 0 {
            return;
        }
        let port = &mut itm.stim[0];
        cortex_m::itm::write_fmt(port, format_args!("[{}] {}\n", log_level_tag(level), args));
    });
}
