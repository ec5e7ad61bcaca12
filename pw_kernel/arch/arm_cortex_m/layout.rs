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

//! Boot time address boundaries produced by the link step.

use crate::error::{Error, Result};

/// Granularity of PMSAv8 region base and limit addresses.
pub const REGION_ALIGNMENT: u32 = 32;

/// Names of the address boundaries checked during validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Boundary {
    CodeStart,
    CodeEnd,
    RodataStart,
    RodataEnd,
    DataStart,
    RamTop,
    PeripheralBase,
    PeripheralLimit,
}

/// Half open address range `[start, end)`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct AddressRange {
    pub start: u32,
    pub end: u32,
}

impl AddressRange {
    pub const fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Inclusive last address of the range.
    pub const fn last(&self) -> u32 {
        self.end.wrapping_sub(1)
    }
}

/// Section boundaries of the running image.
///
/// All `*_end` and `ram_top` values are exclusive.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct MemoryLayout {
    pub code_start: u32,
    pub code_end: u32,
    pub rodata_start: u32,
    pub rodata_end: u32,
    pub data_start: u32,
    pub ram_top: u32,
}

pub(crate) const fn is_aligned(addr: u32) -> bool {
    addr % REGION_ALIGNMENT == 0
}

pub(crate) fn check_aligned(boundary: Boundary, addr: u32) -> Result<()> {
    if is_aligned(addr) {
        Ok(())
    } else {
        Err(Error::UnalignedBoundary { boundary, addr })
    }
}

fn check_order(lower: (Boundary, u32), upper: (Boundary, u32), strict: bool) -> Result<()> {
    let ok = if strict {
        lower.1 < upper.1
    } else {
        lower.1 <= upper.1
    };
    if ok {
        Ok(())
    } else {
        Err(Error::BoundaryOrder {
            lower: lower.0,
            upper: upper.0,
        })
    }
}

impl MemoryLayout {
    /// Checks alignment of every boundary, then their ordering.
    ///
    /// The first violation found is returned.
    pub fn validate(&self) -> Result<()> {
        for (boundary, addr) in self.boundaries() {
            check_aligned(boundary, addr)?;
        }

        use Boundary::*;
        check_order((CodeStart, self.code_start), (CodeEnd, self.code_end), true)?;
        check_order((CodeEnd, self.code_end), (RodataStart, self.rodata_start), false)?;
        check_order(
            (RodataStart, self.rodata_start),
            (RodataEnd, self.rodata_end),
            true,
        )?;
        check_order((RodataEnd, self.rodata_end), (DataStart, self.data_start), false)?;
        check_order((DataStart, self.data_start), (RamTop, self.ram_top), true)
    }

    fn boundaries(&self) -> [(Boundary, u32); 6] {
        [
            (Boundary::CodeStart, self.code_start),
            (Boundary::CodeEnd, self.code_end),
            (Boundary::RodataStart, self.rodata_start),
            (Boundary::RodataEnd, self.rodata_end),
            (Boundary::DataStart, self.data_start),
            (Boundary::RamTop, self.ram_top),
        ]
    }

    pub const fn code(&self) -> AddressRange {
        AddressRange::new(self.code_start, self.code_end)
    }

    pub const fn rodata(&self) -> AddressRange {
        AddressRange::new(self.rodata_start, self.rodata_end)
    }

    /// Writable data through the top of the stack.
    pub const fn ram(&self) -> AddressRange {
        AddressRange::new(self.data_start, self.ram_top)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LAYOUT: MemoryLayout = MemoryLayout {
        code_start: 0x1000,
        code_end: 0x2000,
        rodata_start: 0x2000,
        rodata_end: 0x2400,
        data_start: 0x2400,
        ram_top: 0x10000,
    };

    #[test]
    fn contiguous_layout_is_valid() {
        assert_eq!(LAYOUT.validate(), Ok(()));
        assert_eq!(LAYOUT.code().last(), 0x1fff);
        assert_eq!(LAYOUT.ram(), AddressRange::new(0x2400, 0x10000));
    }

    #[test]
    fn gaps_between_sections_are_allowed() {
        let layout = MemoryLayout {
            rodata_start: 0x3000,
            rodata_end: 0x3400,
            data_start: 0x2000_0000,
            ram_top: 0x2004_0000,
            ..LAYOUT
        };
        assert_eq!(layout.validate(), Ok(()));
    }

    #[test]
    fn unaligned_boundary_is_rejected() {
        let layout = MemoryLayout {
            rodata_end: 0x2410,
            ..LAYOUT
        };
        assert_eq!(
            layout.validate(),
            Err(Error::UnalignedBoundary {
                boundary: Boundary::RodataEnd,
                addr: 0x2410,
            })
        );
    }

    #[test]
    fn overlapping_code_and_rodata_is_rejected() {
        let layout = MemoryLayout {
            code_end: 0x2020,
            ..LAYOUT
        };
        assert_eq!(
            layout.validate(),
            Err(Error::BoundaryOrder {
                lower: Boundary::CodeEnd,
                upper: Boundary::RodataStart,
            })
        );
    }

    #[test]
    fn empty_sections_are_rejected() {
        let layout = MemoryLayout {
            code_end: 0x1000,
            ..LAYOUT
        };
        assert_eq!(
            layout.validate(),
            Err(Error::BoundaryOrder {
                lower: Boundary::CodeStart,
                upper: Boundary::CodeEnd,
            })
        );

        let layout = MemoryLayout {
            ram_top: 0x2400,
            ..LAYOUT
        };
        assert_eq!(
            layout.validate(),
            Err(Error::BoundaryOrder {
                lower: Boundary::DataStart,
                upper: Boundary::RamTop,
            })
        );
    }
}
