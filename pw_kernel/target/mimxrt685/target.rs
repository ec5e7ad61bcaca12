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
#![cfg_attr(target_os = "none", no_std, no_main)]

use arch_arm_cortex_m::{BootHooks, MemoryLayout, boot};
#[cfg(target_os = "none")]
use panic_halt as _;

mod config;
#[cfg(target_os = "none")]
mod console;
#[cfg(target_os = "none")]
mod exceptions;

use config::ProtectionConfig;

pub struct Target {}

impl Target {
    const NAME: &'static str = "MIMXRT685";
}

impl BootHooks for Target {
    fn post_data_init() {
        // Clocks and pins are left as configured by the boot ROM; neither
        // console needs bring-up.
        pw_log::info!("{} booting", Target::NAME);
    }

    fn shutdown() {
        pw_log::info!("Bye!");
    }
}

/// Section boundaries from the cortex-m-rt linker script and `memory.x`.
#[cfg(target_os = "none")]
fn memory_layout() -> MemoryLayout {
    use arch_arm_cortex_m::layout::REGION_ALIGNMENT;

    unsafe extern "C" {
        static __code_start: u8;
        static __etext: u8;
        static __srodata: u8;
        static __erodata: u8;
        static __sdata: u8;
        static _stack_start: u8;
    }

    // cortex-m-rt aligns sections to 4 bytes; widen each boundary to the
    // MPU granularity.  Rounding the end of code up also rounds the start of
    // rodata up, so the bytes in between stay read-only and executable.
    const fn align_up(addr: u32) -> u32 {
        (addr + REGION_ALIGNMENT - 1) & !(REGION_ALIGNMENT - 1)
    }
    const fn align_down(addr: u32) -> u32 {
        addr & !(REGION_ALIGNMENT - 1)
    }

    // SAFETY: Only the addresses of the linker symbols are taken.
    unsafe {
        MemoryLayout {
            code_start: align_down((&raw const __code_start) as u32),
            code_end: align_up((&raw const __etext) as u32),
            rodata_start: align_up((&raw const __srodata) as u32),
            rodata_end: align_up((&raw const __erodata) as u32),
            data_start: align_down((&raw const __sdata) as u32),
            ram_top: align_down((&raw const _stack_start) as u32),
        }
    }
}

#[cfg(target_os = "none")]
#[allow(deprecated)]
#[cortex_m_rt::pre_init]
unsafe fn pre_init() {
    <Target as BootHooks>::pre_data_init();
}

#[cfg(target_os = "none")]
#[unsafe(no_mangle)]
#[allow(non_snake_case)]
pub extern "C" fn pw_assert_HandleFailure() -> ! {
    // Boot must not continue with weaker protection than configured.
    cortex_m::interrupt::disable();
    loop {
        cortex_m::asm::wfi();
    }
}

#[cfg(target_os = "none")]
#[cortex_m_rt::entry]
fn main() -> ! {
    use arch_arm_cortex_m::Mmio;

    let Some(io) = Mmio::take() else {
        pw_assert::panic!("register accessor already taken");
    };

    boot::run::<Target, ProtectionConfig, _, _>(io, &memory_layout(), |armed| {
        if let Some(armed) = armed {
            exceptions::hand_off(armed);
        }
        pw_log::info!("Application started");
    });

    #[cfg(feature = "semihosting")]
    cortex_m_semihosting::debug::exit(cortex_m_semihosting::debug::EXIT_SUCCESS);

    // Without semihosting, and in the rare case `exit` returns, the watchpoints
    // stay armed while the core sleeps.
    loop {
        cortex_m::asm::wfi();
    }
}

/// Host build: run the boot sequence against a simulated Cortex-M33.
#[cfg(not(target_os = "none"))]
fn main() {
    use arch_arm_cortex_m::sim::SimulatedRegisters;

    // Image layout produced by `memory.x` for a small application.
    const LAYOUT: MemoryLayout = MemoryLayout {
        code_start: 0x0800_1000,
        code_end: 0x0800_9000,
        rodata_start: 0x0800_9000,
        rodata_end: 0x0800_a000,
        data_start: 0x2008_0000,
        ram_top: 0x2020_0000,
    };

    // Four comparators form pairs 0 and 1; both pairs can link into a range.
    let sim = SimulatedRegisters::cortex_m33(4, &[0, 1]);

    boot::run::<Target, ProtectionConfig, _, _>(sim, &LAYOUT, |armed| {
        if let Some(armed) = armed {
            let allocation = armed.allocation();
            pw_log::info!(
                "Code watched by pair {}, debug registers by pair {}",
                allocation.code.index,
                allocation.debug_registers.index
            );
        }
        pw_log::info!("Application started");
    });
}
