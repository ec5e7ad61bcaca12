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

//! # regs
//!
//! Typed descriptions of 32-bit memory mapped registers.
//!
//! Registers are described by zero sized marker types (or, for register
//! arrays, small descriptors carrying a computed address) and value types
//! wrapping the raw `u32`.  All reads and writes go through a
//! [`RegisterAccess`] implementation so the same register description can
//! drive real hardware or a simulated register file.
//!
//! ```
//! use regs::*;
//!
//! #[derive(Copy, Clone, Default)]
//! #[repr(transparent)]
//! pub struct CtrlVal(u32);
//! impl CtrlVal {
//!     rw_bool_field!(enable, 0, "enable");
//!     rw_int_field!(count, 4, 7, u8, "count");
//! }
//! rw_reg!(Ctrl, CtrlVal, 0x4000_0000, "Control Register");
//!
//! let val = CtrlVal::default().with_enable(true).with_count(3);
//! assert!(val.enable());
//! assert_eq!(val.count(), 3);
//! ```
#![no_std]

#[doc(hidden)]
pub use paste;

/// Access to a bank of 32-bit memory mapped registers.
///
/// Implementations decide what an address means: the hardware accessor
/// performs volatile loads and stores while test accessors model a register
/// file in memory.  Barriers are part of the interface because register
/// writes that change memory permissions must be ordered with respect to
/// the surrounding instruction stream.
pub trait RegisterAccess {
    /// Read the 32-bit register at `addr`.
    fn read_u32(&self, addr: usize) -> u32;

    /// Write `val` to the 32-bit register at `addr`.
    fn write_u32(&mut self, addr: usize, val: u32);

    /// Data synchronization barrier.
    fn dsb(&mut self);

    /// Instruction synchronization barrier.
    fn isb(&mut self);
}

impl<T: RegisterAccess + ?Sized> RegisterAccess for &mut T {
    #[inline]
    fn read_u32(&self, addr: usize) -> u32 {
        (**self).read_u32(addr)
    }

    #[inline]
    fn write_u32(&mut self, addr: usize, val: u32) {
        (**self).write_u32(addr, val)
    }

    #[inline]
    fn dsb(&mut self) {
        (**self).dsb()
    }

    #[inline]
    fn isb(&mut self) {
        (**self).isb()
    }
}

pub trait RO {
    const ADDR: usize;

    /// Read a raw value from the register
    #[inline]
    fn raw_read<A: RegisterAccess + ?Sized>(&self, io: &A) -> u32 {
        io.read_u32(Self::ADDR)
    }
}

pub trait RW {
    const ADDR: usize;

    /// Read a raw value from the register
    #[inline]
    fn raw_read<A: RegisterAccess + ?Sized>(&self, io: &A) -> u32 {
        io.read_u32(Self::ADDR)
    }

    /// Write a raw value to the register
    #[inline]
    fn raw_write<A: RegisterAccess + ?Sized>(&mut self, io: &mut A, val: u32) {
        io.write_u32(Self::ADDR, val)
    }
}

#[macro_export]
macro_rules! ro_bool_field {
    ($name:ident, $offset:literal, $desc:literal) => {
        #[doc = concat!("Extract ", $desc, " field")]
        #[inline]
        pub const fn $name(&self) -> bool {
            $crate::ops::get_bool(self.0, $offset)
        }
    };
}

#[macro_export]
macro_rules! rw_bool_field {
    ($name:ident, $offset:literal, $desc:literal) => {
        $crate::ro_bool_field!($name, $offset, $desc);
        $crate::paste::paste! {
            #[doc = concat!("Update ", $desc, " field")]
            #[inline]
            pub const fn [<with_ $name>](self, val: bool) -> Self {
                Self($crate::ops::set_bool(self.0, $offset, val))
            }
        }
    };
}

#[macro_export]
macro_rules! ro_int_field {
    ($name:ident, $start:literal, $end:literal, $ty:ty, $desc:literal) => {
        #[doc = concat!("Extract ", $desc, " field")]
        #[inline]
        pub const fn $name(&self) -> $ty {
            $crate::ops::get_u32(self.0, $start, $end) as $ty
        }
    };
}

#[macro_export]
macro_rules! rw_int_field {
    ($name:ident, $start:literal, $end:literal, $ty:ty, $desc:literal) => {
        $crate::ro_int_field!($name, $start, $end, $ty, $desc);
        $crate::paste::paste! {
            #[doc = concat!("Update ", $desc, " field")]
            #[inline]
            pub const fn [<with_ $name>](self, val: $ty) -> Self {
                Self($crate::ops::set_u32(self.0, $start, $end, val as u32))
            }
        }
    };
}

/// Enum valued field.
///
/// `$enum` must be a fieldless enum with an inherent
/// `const fn from_raw(u32) -> Option<Self>`.  Bit patterns the enum does not
/// name read back as `None`.
#[macro_export]
macro_rules! rw_enum_field {
    ($name:ident, $start:literal, $end:literal, $enum:ty, $desc:literal) => {
        #[doc = concat!("Extract ", $desc, " field")]
        #[inline]
        pub const fn $name(&self) -> Option<$enum> {
            <$enum>::from_raw($crate::ops::get_u32(self.0, $start, $end))
        }
        $crate::paste::paste! {
            #[doc = concat!("Update ", $desc, " field")]
            #[inline]
            pub const fn [<with_ $name>](self, val: $enum) -> Self {
                Self($crate::ops::set_u32(self.0, $start, $end, val as u32))
            }
        }
    };
}

#[macro_export]
macro_rules! ro_masked_field {
    ($name:ident, $mask:literal, $desc:literal) => {
        #[doc = concat!("Extract ", $desc, " field")]
        #[inline]
        pub const fn $name(&self) -> u32 {
            self.0 & $mask
        }
    };
}

#[macro_export]
macro_rules! rw_masked_field {
    ($name:ident, $mask:literal, $desc:literal) => {
        $crate::ro_masked_field!($name, $mask, $desc);
        $crate::paste::paste! {
            #[doc = concat!("Update ", $desc, " field")]
            #[inline]
            pub const fn [<with_ $name>](self, val: u32) -> Self {
                Self(self.0 & !$mask | (val & $mask))
            }
        }
    };
}

#[macro_export]
macro_rules! ro_reg {
    ($name:ident, $val_type:ident, $addr:literal, $desc:literal) => {
        #[doc = $desc]
        pub struct $name;
        impl $crate::RO for $name {
            const ADDR: usize = $addr;
        }
        impl $name {
            #[inline]
            pub fn read<A: $crate::RegisterAccess + ?Sized>(&self, io: &A) -> $val_type {
                $val_type($crate::RO::raw_read(self, io))
            }
        }
    };
}

#[macro_export]
macro_rules! rw_reg {
    ($name:ident, $val_type:ident, $addr:literal, $desc:literal) => {
        #[doc = $desc]
        pub struct $name;
        impl $crate::RW for $name {
            const ADDR: usize = $addr;
        }
        impl $name {
            #[inline]
            pub fn read<A: $crate::RegisterAccess + ?Sized>(&self, io: &A) -> $val_type {
                $val_type($crate::RW::raw_read(self, io))
            }

            #[inline]
            pub fn write<A: $crate::RegisterAccess + ?Sized>(&mut self, io: &mut A, val: $val_type) {
                $crate::RW::raw_write(self, io, val.0)
            }
        }
    };
}

/// An array of identical registers laid out at a fixed stride.
///
/// Generates a descriptor type whose instances are created with
/// `$name::at(index)`.
#[macro_export]
macro_rules! rw_array_reg {
    ($name:ident, $val_type:ident, $base:literal, $stride:literal, $count:literal, $desc:literal) => {
        #[doc = $desc]
        #[derive(Copy, Clone, Debug, PartialEq, Eq)]
        pub struct $name {
            addr: usize,
        }
        impl $name {
            /// Number of registers in the array.
            pub const COUNT: usize = $count;

            /// Descriptor for register `index`.
            ///
            /// # Panics
            /// Panics if `index` is not smaller than `COUNT`.
            #[inline]
            pub const fn at(index: usize) -> Self {
                assert!(index < $count);
                Self {
                    addr: $base + index * $stride,
                }
            }

            /// Address of this register.
            #[inline]
            pub const fn addr(&self) -> usize {
                self.addr
            }

            #[inline]
            pub fn read<A: $crate::RegisterAccess + ?Sized>(&self, io: &A) -> $val_type {
                $val_type($crate::RegisterAccess::read_u32(io, self.addr))
            }

            #[inline]
            pub fn write<A: $crate::RegisterAccess + ?Sized>(&mut self, io: &mut A, val: $val_type) {
                $crate::RegisterAccess::write_u32(io, self.addr, val.0)
            }
        }
    };
}

pub mod ops {
    #[inline]
    pub const fn mask(start: u32, end: u32) -> u32 {
        let length = end - start + 1;
        (((1u64 << length) - 1) as u32) << start
    }

    #[inline]
    pub const fn get_bool(value: u32, bit: u32) -> bool {
        (value >> bit) & 0x1 == 0x1
    }

    #[inline]
    pub const fn set_bool(value: u32, bit: u32, field_value: bool) -> u32 {
        value & !(1 << bit) | ((field_value as u32) << bit)
    }

    #[inline]
    pub const fn get_u32(value: u32, start: u32, end: u32) -> u32 {
        (value & mask(start, end)) >> start
    }

    #[inline]
    pub const fn set_u32(value: u32, start: u32, end: u32, field_value: u32) -> u32 {
        let mask = mask(start, end);
        (value & !mask) | ((field_value << start) & mask)
    }
}
