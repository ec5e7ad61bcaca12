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

//! Boot sequence that establishes memory protection and integrity
//! watchpoints before application code runs.

use kernel_config::CortexMProtectionConfigInterface;
use regs::RegisterAccess;

use crate::error::Result;
use crate::layout::MemoryLayout;
use crate::protection::{self, ProtectionPolicy};
use crate::watchpoint::{self, Allocation, Duty};

/// Board lifecycle callbacks invoked by the boot sequence.
pub trait BootHooks {
    /// Runs before `.data` and `.bss` are initialized.
    ///
    /// Implementations must not read or write statics.
    fn pre_data_init() {}

    /// Clock, pin and console bring-up.  Runs before [`SecurityInit`].
    fn post_data_init() {}

    /// Runs after the application returns.
    fn shutdown() {}
}

/// One shot configuration of the MPU and the DWT.
///
/// Consumed by [`SecurityInit::run`].  Running the sequence a second time,
/// for instance through another accessor obtained with
/// [`crate::Mmio::steal`], is not supported and leaves the hardware in an
/// undefined configuration.
pub struct SecurityInit<A: RegisterAccess> {
    io: A,
}

impl<A: RegisterAccess> SecurityInit<A> {
    pub fn new(io: A) -> Self {
        Self { io }
    }

    /// Validate the layout and the hardware, then program the MPU followed
    /// by the watchpoints.
    ///
    /// Every check runs before the first register write, so on error the
    /// hardware is untouched.
    pub fn run<C: CortexMProtectionConfigInterface>(
        mut self,
        layout: &MemoryLayout,
    ) -> Result<Armed<A>> {
        let policy = ProtectionPolicy::new::<C>(layout)?;
        protection::check_mpu(&self.io)?;
        let allocation = watchpoint::plan(&self.io)?;

        policy.write(&mut self.io);
        watchpoint::arm(&mut self.io, &allocation, layout.code());

        Ok(Armed {
            io: self.io,
            policy,
            allocation,
        })
    }
}

/// Protection state after a successful [`SecurityInit`].
///
/// Owns the register accessor and only offers read-only queries.
pub struct Armed<A: RegisterAccess> {
    io: A,
    policy: ProtectionPolicy,
    allocation: Allocation,
}

impl<A: RegisterAccess> Armed<A> {
    pub fn policy(&self) -> &ProtectionPolicy {
        &self.policy
    }

    pub fn allocation(&self) -> &Allocation {
        &self.allocation
    }

    /// Duty whose watchpoint fired since the last query.
    pub fn triggered(&self) -> Option<Duty> {
        self.allocation.triggered(&self.io)
    }
}

/// Run [`SecurityInit`] according to `C`.
///
/// Returns `None` when protection is compiled out.  Any failed check halts
/// through `pw_assert`.
pub fn init<C, A>(io: A, layout: &MemoryLayout) -> Option<Armed<A>>
where
    C: CortexMProtectionConfigInterface,
    A: RegisterAccess,
{
    if !C::PROTECTION_ENABLED {
        pw_log::warn!("Memory protection disabled, skipping security init");
        return None;
    }

    match SecurityInit::new(io).run::<C>(layout) {
        Ok(armed) => {
            pw_log::info!("Security init complete");
            Some(armed)
        }
        Err(e) => pw_assert::panic!(
            "Security init failed: {} (status {})",
            e,
            e.status_code()
        ),
    }
}

/// Full boot sequence after `.data` and `.bss` are initialized.
///
/// `app` receives the armed state and is expected to hand it to the fault
/// handling side before running application code.
pub fn run<H, C, A, F>(io: A, layout: &MemoryLayout, app: F)
where
    H: BootHooks,
    C: CortexMProtectionConfigInterface,
    A: RegisterAccess,
    F: FnOnce(Option<Armed<A>>),
{
    H::post_data_init();
    let armed = init::<C, A>(io, layout);
    app(armed);
    H::shutdown();
}
