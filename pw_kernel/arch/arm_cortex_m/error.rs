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

use core::fmt;

use crate::layout::Boundary;

/// Pigweed status code for `FAILED_PRECONDITION`.
pub const STATUS_FAILED_PRECONDITION: u32 = 9;
/// Pigweed status code for `RESOURCE_EXHAUSTED`.
pub const STATUS_RESOURCE_EXHAUSTED: u32 = 8;
/// Pigweed status code for `UNAVAILABLE`.
pub const STATUS_UNAVAILABLE: u32 = 14;

/// Debug units whose presence is required before arming watchpoints.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DebugUnit {
    /// Data Watchpoint and Trace unit.
    Dwt,
    /// Instrumentation Trace Macrocell.
    Itm,
}

/// Reasons the protection configuration can not be established.
///
/// Every variant is a static property of the linker output or of the
/// silicon, so none of them is worth retrying.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Error {
    /// A boundary is not aligned to the MPU region granularity.
    UnalignedBoundary { boundary: Boundary, addr: u32 },

    /// Two boundaries are not in the required order.
    BoundaryOrder { lower: Boundary, upper: Boundary },

    /// The MPU implements fewer data regions than the policy programs.
    InsufficientMpuRegions { implemented: u8 },

    /// A required debug unit is missing from the ROM table.
    UnitNotImplemented(DebugUnit),

    /// The DWT implements fewer comparators than the policy needs.
    InsufficientComparators { implemented: u8 },

    /// Fewer comparator pairs than duties can be linked into a range.
    InsufficientLinkablePairs { found: usize },
}

impl Error {
    /// Canonical pigweed status code for this error.
    pub const fn status_code(&self) -> u32 {
        match self {
            Error::UnalignedBoundary { .. } | Error::BoundaryOrder { .. } => {
                STATUS_FAILED_PRECONDITION
            }
            Error::InsufficientMpuRegions { .. }
            | Error::InsufficientComparators { .. }
            | Error::InsufficientLinkablePairs { .. } => STATUS_RESOURCE_EXHAUSTED,
            Error::UnitNotImplemented(_) => STATUS_UNAVAILABLE,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::UnalignedBoundary { boundary, addr } => {
                write!(f, "{boundary:?} {addr:#010x} is not 32 byte aligned")
            }
            Error::BoundaryOrder { lower, upper } => {
                write!(f, "{lower:?} must be below {upper:?}")
            }
            Error::InsufficientMpuRegions { implemented } => {
                write!(f, "MPU implements {implemented} regions")
            }
            Error::UnitNotImplemented(unit) => write!(f, "{unit:?} not implemented"),
            Error::InsufficientComparators { implemented } => {
                write!(f, "DWT implements {implemented} comparators")
            }
            Error::InsufficientLinkablePairs { found } => {
                write!(f, "found {found} linkable comparator pairs")
            }
        }
    }
}

pub type Result<T> = core::result::Result<T, Error>;
