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

//! Debug Control Block registers.

use regs::*;

/// Base address of the Debug Control Block.
pub const DCB_BASE: u32 = 0xe000_edf0;

/// Size of the Debug Control Block register window.
pub const DCB_SIZE: u32 = 0x1c;

/// Debug Control Block register bank
pub struct Dcb {
    /// Debug Exception and Monitor Control Register
    pub demcr: Demcr,
}

impl Dcb {
    pub(super) const fn new() -> Self {
        Self { demcr: Demcr }
    }
}

#[derive(Copy, Clone, Default, Debug, PartialEq, Eq)]
#[repr(transparent)]
pub struct DemcrVal(pub u32);
impl DemcrVal {
    rw_bool_field!(vc_corereset, 0, "reset vector catch");
    rw_bool_field!(mon_en, 16, "DebugMonitor exception enable");
    rw_bool_field!(mon_pend, 17, "DebugMonitor pending");
    rw_bool_field!(mon_step, 18, "DebugMonitor single step");
    rw_bool_field!(mon_req, 19, "DebugMonitor semaphore");
    rw_bool_field!(trcena, 24, "DWT and ITM enable");
}
rw_reg!(
    Demcr,
    DemcrVal,
    0xe000edfc,
    "Debug Exception and Monitor Control Register"
);
