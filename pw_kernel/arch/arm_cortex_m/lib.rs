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

//! Boot time memory protection and integrity watchpoints for ARMv8-M
//! Mainline cores.
//!
//! [`boot::init`] programs the MPU with a fixed four region table derived
//! from the image [`MemoryLayout`] and then arms two linked DWT comparator
//! pairs: one trapping any access to the code region and one trapping
//! writes to the debug registers that hold the watchpoint configuration.
//! A watchpoint hit raises the DebugMonitor exception.
#![cfg_attr(target_os = "none", no_std)]

pub mod boot;
pub mod error;
pub mod layout;
mod mmio;
pub mod protection;
pub mod regs;
#[cfg(not(target_os = "none"))]
pub mod sim;
pub mod watchpoint;

// Re-exports to conform to simplify public API.
pub use boot::{Armed, BootHooks, SecurityInit};
pub use error::{DebugUnit, Error, Result};
pub use layout::{AddressRange, MemoryLayout};
pub use mmio::Mmio;
pub use watchpoint::{Allocation, Duty};
