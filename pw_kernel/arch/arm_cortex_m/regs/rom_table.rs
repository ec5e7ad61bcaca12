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

//! CoreSight ROM table entries of the Cortex-M33 processor.

use regs::*;

/// Processor ROM table register bank
pub struct RomTable {
    /// DWT entry
    pub dwt: DwtEntry,

    /// ITM entry
    pub itm: ItmEntry,
}

impl RomTable {
    pub(super) const fn new() -> Self {
        Self {
            dwt: DwtEntry,
            itm: ItmEntry,
        }
    }
}

#[derive(Copy, Clone, Default, Debug, PartialEq, Eq)]
#[repr(transparent)]
pub struct EntryVal(pub u32);
impl EntryVal {
    ro_bool_field!(present, 0, "component present");
    ro_bool_field!(format, 1, "32-bit entry format");
    ro_masked_field!(offset, 0xffff_f000, "component address offset");
}
ro_reg!(DwtEntry, EntryVal, 0xe00ff004, "ROM table DWT entry");
ro_reg!(ItmEntry, EntryVal, 0xe00ff00c, "ROM table ITM entry");
