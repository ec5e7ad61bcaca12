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

//! Simulated Cortex-M33 register file for host builds.
//!
//! Models the pieces of register behavior the boot sequence depends on:
//! RNR banked MPU region registers, read-only capability bits, and the
//! clear-on-read `MATCHED` flag of DWT function registers.  Every write and
//! barrier is appended to an event log so tests can check ordering.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::vec::Vec;

use regs::{RO, RW, RegisterAccess};

use crate::error::DebugUnit;
use crate::regs::dwt::{Comp, Function};
use crate::regs::mpu::{RbarVal, RlarVal};
use crate::regs::{dcb, dwt, mpu, rom_table};

/// Number of MPU region slots modeled.
pub const MAX_MPU_REGIONS: usize = 16;

const FUNCTION_ID_MASK: u32 = 0xf800_0000;
const FUNCTION_MATCHED: u32 = 1 << 24;

// Cortex-M33 FUNCTION.ID values: data address comparator with and without
// data address limit support.
const ID_LIMIT_CAPABLE: u32 = 0b1_1010;
const ID_ADDRESS_ONLY: u32 = 0b0_1010;

// Processor ROM table entries as found on the Cortex-M33.
const ROM_DWT_PRESENT: u32 = 0xfff0_2003;
const ROM_ITM_PRESENT: u32 = 0xfff0_1003;

/// Something observable that happened to the register file.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Event {
    Write { addr: usize, val: u32 },
    Dsb,
    Isb,
}

#[derive(Default)]
pub struct SimulatedRegisters {
    values: RefCell<BTreeMap<usize, u32>>,
    read_only: BTreeMap<usize, u32>,
    rbar: [u32; MAX_MPU_REGIONS],
    rlar: [u32; MAX_MPU_REGIONS],
    events: Vec<Event>,
}

impl SimulatedRegisters {
    /// Empty register file; every register reads as zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// A Cortex-M33 with an 8 region MPU, DWT and ITM present,
    /// `num_comparators` DWT comparators and the given comparator pairs
    /// able to link into a range.
    ///
    /// # Panics
    /// Panics if `num_comparators` does not fit `DWT_CTRL.NUMCOMP`.
    pub fn cortex_m33(num_comparators: u8, linkable_pairs: &[usize]) -> Self {
        assert!(num_comparators <= 0xf, "NUMCOMP is a 4-bit field");
        let mut sim = Self::new()
            .with_mpu_regions(8)
            .with_value(rom_table::DwtEntry::ADDR, ROM_DWT_PRESENT)
            .with_value(rom_table::ItmEntry::ADDR, ROM_ITM_PRESENT)
            .with_value(dwt::Ctrl::ADDR, u32::from(num_comparators) << 28);

        for index in 0..Function::COUNT {
            let addr = Function::at(index).addr();
            let id = if index % 2 == 1 && linkable_pairs.contains(&(index / 2)) {
                ID_LIMIT_CAPABLE
            } else {
                ID_ADDRESS_ONLY
            };
            sim = sim.with_value(addr, id << 27);
            sim.read_only
                .insert(addr, FUNCTION_ID_MASK | FUNCTION_MATCHED);
        }
        sim
    }

    /// Set `MPU_TYPE.DREGION`.
    pub fn with_mpu_regions(self, dregion: u8) -> Self {
        self.with_value(mpu::Type::ADDR, u32::from(dregion) << 8)
    }

    /// Clear the ROM table presence bit of `unit`.
    pub fn without_unit(self, unit: DebugUnit) -> Self {
        let addr = match unit {
            DebugUnit::Dwt => rom_table::DwtEntry::ADDR,
            DebugUnit::Itm => rom_table::ItmEntry::ADDR,
        };
        let val = self.value(addr) & !1;
        self.with_value(addr, val)
    }

    /// Preset the register at `addr` without logging an event.
    pub fn with_value(self, addr: usize, val: u32) -> Self {
        self.values.borrow_mut().insert(addr, val);
        self
    }

    /// Raise the `MATCHED` flag of `comparator` as a watchpoint hit would.
    pub fn trigger(&mut self, comparator: usize) {
        let addr = Function::at(comparator).addr();
        let val = self.value(addr) | FUNCTION_MATCHED;
        self.values.borrow_mut().insert(addr, val);
    }

    /// Current value at `addr` without read side effects.
    pub fn value(&self, addr: usize) -> u32 {
        self.values.borrow().get(&addr).copied().unwrap_or(0)
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// All logged writes in order.
    pub fn writes(&self) -> Vec<(usize, u32)> {
        self.events
            .iter()
            .filter_map(|event| match *event {
                Event::Write { addr, val } => Some((addr, val)),
                _ => None,
            })
            .collect()
    }

    /// Position in the event log of the first write to `addr`.
    pub fn first_write_to(&self, addr: usize) -> Option<usize> {
        self.events
            .iter()
            .position(|event| matches!(*event, Event::Write { addr: a, .. } if a == addr))
    }

    /// Contents of MPU region slot `index`.
    pub fn mpu_region(&self, index: usize) -> (RbarVal, RlarVal) {
        (RbarVal(self.rbar[index]), RlarVal(self.rlar[index]))
    }

    /// Comparator and function values of DWT comparator `index`.
    pub fn comparator(&self, index: usize) -> (u32, dwt::FunctionVal) {
        (
            self.value(Comp::at(index).addr()),
            dwt::FunctionVal(self.value(Function::at(index).addr())),
        )
    }

    pub fn demcr(&self) -> dcb::DemcrVal {
        dcb::DemcrVal(self.value(dcb::Demcr::ADDR))
    }

    fn selected_region(&self) -> usize {
        self.value(mpu::Rnr::ADDR) as usize % MAX_MPU_REGIONS
    }
}

impl RegisterAccess for SimulatedRegisters {
    fn read_u32(&self, addr: usize) -> u32 {
        if addr == mpu::Rbar::ADDR {
            return self.rbar[self.selected_region()];
        }
        if addr == mpu::Rlar::ADDR {
            return self.rlar[self.selected_region()];
        }

        let val = self.value(addr);
        if val & FUNCTION_MATCHED != 0 && self.read_only.contains_key(&addr) {
            self.values
                .borrow_mut()
                .insert(addr, val & !FUNCTION_MATCHED);
        }
        val
    }

    fn write_u32(&mut self, addr: usize, val: u32) {
        self.events.push(Event::Write { addr, val });

        if addr == mpu::Rbar::ADDR {
            let region = self.selected_region();
            self.rbar[region] = val;
            return;
        }
        if addr == mpu::Rlar::ADDR {
            let region = self.selected_region();
            self.rlar[region] = val;
            return;
        }

        let stored = match self.read_only.get(&addr) {
            Some(&mask) => (self.value(addr) & mask) | (val & !mask),
            None => val,
        };
        self.values.borrow_mut().insert(addr, stored);
    }

    fn dsb(&mut self) {
        self.events.push(Event::Dsb);
    }

    fn isb(&mut self) {
        self.events.push(Event::Isb);
    }
}
