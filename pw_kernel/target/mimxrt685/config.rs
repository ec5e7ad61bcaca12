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

pub use kernel_config::CortexMProtectionConfigInterface;

pub struct ProtectionConfig;

impl CortexMProtectionConfigInterface for ProtectionConfig {
    // FlexSPI, AHB peripherals and the PPB.
    const PERIPHERAL_APERTURE_BASE: u32 = 0x4000_0000;
    const PERIPHERAL_APERTURE_LIMIT: u32 = 0xdfff_ffff;
}
