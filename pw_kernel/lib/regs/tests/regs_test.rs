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

use std::collections::BTreeMap;

use regs::*;

/// Minimal register file keyed by address.
#[derive(Default)]
struct Bank {
    values: BTreeMap<usize, u32>,
    barriers: usize,
}

impl RegisterAccess for Bank {
    fn read_u32(&self, addr: usize) -> u32 {
        self.values.get(&addr).copied().unwrap_or(0)
    }

    fn write_u32(&mut self, addr: usize, val: u32) {
        self.values.insert(addr, val);
    }

    fn dsb(&mut self) {
        self.barriers += 1;
    }

    fn isb(&mut self) {
        self.barriers += 1;
    }
}

#[derive(Debug, PartialEq, Eq)]
#[repr(u8)]
enum Mode {
    Off = 0b00,
    On = 0b01,
    Blink = 0b11,
}

impl Mode {
    const fn from_raw(raw: u32) -> Option<Self> {
        match raw {
            0b00 => Some(Self::Off),
            0b01 => Some(Self::On),
            0b11 => Some(Self::Blink),
            _ => None,
        }
    }
}

#[derive(Copy, Clone, Default, Debug, PartialEq, Eq)]
#[repr(transparent)]
struct TestVal(u32);
impl TestVal {
    rw_bool_field!(enable, 0, "enable");
    rw_enum_field!(mode, 1, 2, Mode, "mode");
    rw_int_field!(count, 8, 15, u8, "count");
    rw_masked_field!(base, 0xffff_0000, "base address");
}
rw_reg!(TestReg, TestVal, 0x4000_0010, "Test Register");

#[repr(transparent)]
struct IdVal(u32);
impl IdVal {
    ro_int_field!(revision, 28, 31, u8, "revision");
}
ro_reg!(IdReg, IdVal, 0x4000_0000, "Identification Register");

#[derive(Copy, Clone, Default)]
#[repr(transparent)]
struct SlotVal(u32);
rw_array_reg!(Slot, SlotVal, 0x4000_1000, 0x10, 4, "Slot Register");

#[test]
fn mask_calculated_correctly() {
    assert_eq!(ops::mask(8, 15), 0x0000_ff00);
    assert_eq!(ops::mask(0, 31), 0xffff_ffff);
}

#[test]
fn get_bool_extracts_correct_value() {
    assert!(!ops::get_bool(0x0000_0100, 7));
    assert!(ops::get_bool(0x0000_0100, 8));
    assert!(!ops::get_bool(0x0000_0100, 9));
}

#[test]
fn set_bool_preserved_unmasked_value() {
    assert_eq!(ops::set_bool(0xffff_ffff, 16, false), 0xfffe_ffff);
}

#[test]
fn get_u32_extracts_correct_value() {
    assert_eq!(ops::get_u32(0x5555_aa55, 8, 15), 0xaa);
}

#[test]
fn set_u32_preserves_unmasked_value() {
    assert_eq!(ops::set_u32(0x5555_5555, 8, 15, 0xaa), 0x5555_aa55);
}

#[test]
fn set_u32_truncates_oversized_field_value() {
    assert_eq!(ops::set_u32(0x0000_0000, 4, 7, 0x1ff), 0x0000_00f0);
}

#[test]
fn field_builders_compose() {
    let val = TestVal::default()
        .with_enable(true)
        .with_mode(Mode::Blink)
        .with_count(0x5a)
        .with_base(0x2001_1234);
    assert_eq!(val.0, 0x2001_5a07);
    assert!(val.enable());
    assert_eq!(val.mode(), Some(Mode::Blink));
    assert_eq!(val.count(), 0x5a);
    assert_eq!(val.base(), 0x2001_0000);
}

#[test]
fn enum_field_reports_unnamed_pattern_as_none() {
    assert_eq!(TestVal(0b100).mode(), None);
    assert_eq!(TestVal(0b010).mode(), Some(Mode::On));
}

#[test]
fn registers_go_through_accessor() {
    let mut bank = Bank::default();
    bank.values.insert(0x4000_0000, 0x3000_0000);

    assert_eq!(IdReg.read(&bank).revision(), 3);

    TestReg.write(&mut bank, TestVal::default().with_count(7));
    assert_eq!(bank.values.get(&0x4000_0010), Some(&0x0000_0700));
    assert_eq!(TestReg.read(&bank).count(), 7);
}

#[test]
fn array_registers_use_stride() {
    let mut bank = Bank::default();
    assert_eq!(Slot::COUNT, 4);
    assert_eq!(Slot::at(0).addr(), 0x4000_1000);
    assert_eq!(Slot::at(3).addr(), 0x4000_1030);

    Slot::at(2).write(&mut bank, SlotVal(0xdead_beef));
    assert_eq!(bank.values.get(&0x4000_1020), Some(&0xdead_beef));
    assert_eq!(Slot::at(2).read(&bank).0, 0xdead_beef);
    assert_eq!(bank.barriers, 0);
}

#[test]
#[should_panic]
fn array_register_index_out_of_range_panics() {
    let _ = Slot::at(4);
}

#[test]
fn mutable_reference_forwards_access() {
    let mut bank = Bank::default();
    {
        let mut io = &mut bank;
        TestReg.write(&mut io, TestVal::default().with_enable(true));
        io.dsb();
        io.isb();
    }
    assert_eq!(bank.values.get(&0x4000_0010), Some(&0x1));
    assert_eq!(bank.barriers, 2);
}
