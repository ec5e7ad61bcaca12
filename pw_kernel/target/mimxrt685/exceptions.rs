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

#![allow(non_snake_case)]

use core::cell::RefCell;

use arch_arm_cortex_m::{Armed, Mmio, watchpoint};
use cortex_m::interrupt::Mutex;
use cortex_m_rt::ExceptionFrame;
use pw_log::error;

/// Protection state handed over by the boot sequence.
static ARMED: Mutex<RefCell<Option<Armed<Mmio>>>> = Mutex::new(RefCell::new(None));

pub fn hand_off(armed: Armed<Mmio>) {
    cortex_m::interrupt::free(|cs| ARMED.borrow(cs).replace(Some(armed)));
}

fn reboot() -> ! {
    error!("Error detected, rebooting...");
    cortex_m::peripheral::SCB::sys_reset()
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn HardFault(frame: &ExceptionFrame) -> ! {
    error!("HardFault pc {:#010x} lr {:#010x}", frame.pc(), frame.lr());
    reboot()
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn DefaultHandler() -> ! {
    reboot()
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn NonMaskableInt() -> ! {
    reboot()
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn MemoryManagement() -> ! {
    error!("MemoryManagement");
    reboot()
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn BusFault() -> ! {
    reboot()
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn UsageFault() -> ! {
    reboot()
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn SecureFault() -> ! {
    reboot()
}

/// Reports which duty's watchpoint fired, then reboots.
///
/// The exception is only taken while halting debug is disabled, and the
/// semihosting console must be compiled out: with `MON_EN` set its `BKPT`
/// traps land here as well.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn DebugMonitor() -> ! {
    // SAFETY: Only reads the DWT status of the exception being handled; the
    // boot sequence has finished.
    let io = unsafe { Mmio::steal() };
    let matched = watchpoint::matched_comparators(&io);
    let duty = cortex_m::interrupt::free(|cs| {
        ARMED
            .borrow(cs)
            .borrow()
            .as_ref()
            .and_then(|armed| armed.allocation().first_duty(matched))
    });
    match duty {
        Some(duty) => error!("Watchpoint hit: {:?}", duty),
        None => error!("DebugMonitor, matched comparators {:#06x}", matched as usize),
    }
    reboot()
}
