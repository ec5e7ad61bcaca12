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

//! Data Watchpoint and Trace unit registers.

use regs::*;

/// Base address of the DWT register block.
pub const DWT_BASE: u32 = 0xe000_1000;

/// Data Watchpoint and Trace register bank
pub struct Dwt {
    /// Control Register
    pub ctrl: Ctrl,
}

impl Dwt {
    pub(super) const fn new() -> Self {
        Self { ctrl: Ctrl }
    }

    /// Comparator register `index`.
    pub const fn comp(&self, index: usize) -> Comp {
        Comp::at(index)
    }

    /// Function register `index`.
    pub const fn function(&self, index: usize) -> Function {
        Function::at(index)
    }
}

#[derive(Copy, Clone, Default, Debug, PartialEq, Eq)]
#[repr(transparent)]
pub struct CtrlVal(pub u32);
impl CtrlVal {
    ro_bool_field!(noprfcnt, 24, "no profiling counter support");
    ro_bool_field!(nocyccnt, 25, "no cycle counter support");
    ro_bool_field!(noexttrig, 26, "no external match signal support");
    ro_bool_field!(notrcpkt, 27, "no trace packet support");
    ro_int_field!(numcomp, 28, 31, u8, "number of comparators");
}
ro_reg!(Ctrl, CtrlVal, 0xe0001000, "DWT Control Register");

#[derive(Copy, Clone, Default, Debug, PartialEq, Eq)]
#[repr(transparent)]
pub struct CompVal(pub u32);
impl CompVal {
    rw_masked_field!(value, 0xffff_ffff, "comparison value");
}
rw_array_reg!(Comp, CompVal, 0xe0001020, 0x10, 16, "DWT Comparator Register");

/// Comparison performed by a comparator.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum FunctionMatch {
    Disabled = 0b0000,
    CycleCounter = 0b0001,
    InstructionAddress = 0b0010,
    InstructionAddressLimit = 0b0011,
    DataAddress = 0b0100,
    DataAddressWrite = 0b0101,
    DataAddressRead = 0b0110,
    DataAddressLimit = 0b0111,
    DataValue = 0b1000,
    DataValueWrite = 0b1001,
    DataValueRead = 0b1010,
    LinkedDataValue = 0b1011,
}

impl FunctionMatch {
    pub const fn from_raw(raw: u32) -> Option<Self> {
        match raw {
            0b0000 => Some(Self::Disabled),
            0b0001 => Some(Self::CycleCounter),
            0b0010 => Some(Self::InstructionAddress),
            0b0011 => Some(Self::InstructionAddressLimit),
            0b0100 => Some(Self::DataAddress),
            0b0101 => Some(Self::DataAddressWrite),
            0b0110 => Some(Self::DataAddressRead),
            0b0111 => Some(Self::DataAddressLimit),
            0b1000 => Some(Self::DataValue),
            0b1001 => Some(Self::DataValueWrite),
            0b1010 => Some(Self::DataValueRead),
            0b1011 => Some(Self::LinkedDataValue),
            _ => None,
        }
    }
}

/// Action taken when a comparator matches.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum FunctionAction {
    /// Trigger only, used for the limit half of a linked pair.
    TriggerOnly = 0b00,
    /// Debug event: DebugMonitor exception or halt.
    DebugEvent = 0b01,
    TraceMatch = 0b10,
    TraceDataValue = 0b11,
}

impl FunctionAction {
    pub const fn from_raw(raw: u32) -> Option<Self> {
        match raw {
            0b00 => Some(Self::TriggerOnly),
            0b01 => Some(Self::DebugEvent),
            0b10 => Some(Self::TraceMatch),
            0b11 => Some(Self::TraceDataValue),
            _ => None,
        }
    }
}

/// Bit of `FUNCTION.ID` set when the comparator can be the limit of a
/// linked address range.
pub const FUNCTION_ID_LIMIT_CAPABLE: u8 = 0b1_0000;

#[derive(Copy, Clone, Default, Debug, PartialEq, Eq)]
#[repr(transparent)]
pub struct FunctionVal(pub u32);
impl FunctionVal {
    pub const fn const_default() -> Self {
        Self(0)
    }

    rw_enum_field!(match_, 0, 3, FunctionMatch, "match type");
    rw_enum_field!(action, 4, 5, FunctionAction, "match action");
    rw_int_field!(datavsize, 10, 11, u8, "data value size");
    ro_bool_field!(matched, 24, "comparator matched since last read");
    ro_int_field!(id, 27, 31, u8, "comparator capabilities");

    /// Whether this comparator can serve as the limit of a linked pair.
    pub const fn supports_linking(&self) -> bool {
        self.id() & FUNCTION_ID_LIMIT_CAPABLE != 0
    }
}
rw_array_reg!(
    Function,
    FunctionVal,
    0xe0001028,
    0x10,
    16,
    "DWT Comparator Function Register"
);
