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
#![no_std]

/// Cortex-M boot time memory protection configuration.
///
/// Targets implement this on a zero sized type and hand it to the boot
/// sequence as a type parameter.  The protection policy itself (four MPU
/// regions, two linked watchpoints) is fixed; only where the device
/// aperture lies and whether protection is established at all vary per
/// target.
pub trait CortexMProtectionConfigInterface {
    /// Whether the boot sequence establishes memory protection and the
    /// watchpoint monitors.  Builds used for baseline measurements turn this
    /// off.
    const PROTECTION_ENABLED: bool = true;

    /// First address of the device memory aperture.
    const PERIPHERAL_APERTURE_BASE: u32 = 0x4000_0000;

    /// Last address (inclusive) of the device memory aperture.
    const PERIPHERAL_APERTURE_LIMIT: u32 = 0xdfff_ffff;
}
