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

pub mod dcb;
pub mod dwt;
pub mod mpu;
pub mod rom_table;

/// Memory mapped register banks of the Cortex-M security features.
///
/// The banks only describe registers.  Every access takes a
/// [`regs::RegisterAccess`] so the same description drives [`crate::Mmio`]
/// and the simulated register file.
pub struct Regs {
    pub mpu: mpu::Mpu,
    pub dwt: dwt::Dwt,
    pub dcb: dcb::Dcb,
    pub rom_table: rom_table::RomTable,
}

impl Regs {
    pub const fn get() -> Self {
        Self {
            mpu: mpu::Mpu::new(),
            dwt: dwt::Dwt::new(),
            dcb: dcb::Dcb::new(),
            rom_table: rom_table::RomTable::new(),
        }
    }
}
