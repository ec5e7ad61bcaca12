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

use kernel_config::CortexMProtectionConfigInterface;
use regs::RegisterAccess;

use crate::error::{Error, Result};
use crate::layout::{AddressRange, Boundary, MemoryLayout, check_aligned};
use crate::regs::Regs;
use crate::regs::mpu::*;

/// Number of MPU regions programmed by the policy.
pub const NUM_REGIONS: usize = 4;

/// Minimum `MPU_TYPE.DREGION` able to hold the policy.
pub const MIN_MPU_REGIONS: u8 = NUM_REGIONS as u8;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u8)]
pub enum RegionIndex {
    Code = 0,
    Rodata = 1,
    Ram = 2,
    Peripherals = 3,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u8)]
pub enum AttrIndex {
    NormalMemory = 0,
    DeviceMemory = 1,
}

/// Encoding of every attribute index in MAIR0.
pub const fn mair0() -> Mair0Val {
    Mair0Val(0)
        // AttrIndex::NormalMemory
        .with_attr0(MairAttr::normal_memory(
            MairNormalMemoryCaching::WriteBackTransientRW,
            MairNormalMemoryCaching::WriteBackTransientRW,
        ))
        // AttrIndex::DeviceMemory
        .with_attr1(MairAttr::device_memory(MairDeviceMemoryOrdering::nGnRE))
        .with_attr2(MairAttr::device_memory(MairDeviceMemoryOrdering::nGnRE))
        .with_attr3(MairAttr::device_memory(MairDeviceMemoryOrdering::nGnRE))
}

/// Encoding of every attribute index in MAIR1.  Unused by the policy.
pub const fn mair1() -> Mair1Val {
    Mair1Val(0)
        .with_attr4(MairAttr::device_memory(MairDeviceMemoryOrdering::nGnRE))
        .with_attr5(MairAttr::device_memory(MairDeviceMemoryOrdering::nGnRE))
        .with_attr6(MairAttr::device_memory(MairDeviceMemoryOrdering::nGnRE))
        .with_attr7(MairAttr::device_memory(MairDeviceMemoryOrdering::nGnRE))
}

/// One entry of the MPU region table.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ProtectionRegion {
    pub index: RegionIndex,
    pub base: u32,
    /// Inclusive.
    pub limit: u32,
    pub sh: RbarSh,
    pub ap: RbarAp,
    pub execute: bool,
    pub attr: AttrIndex,
}

impl ProtectionRegion {
    const fn new(
        index: RegionIndex,
        range: AddressRange,
        ap: RbarAp,
        execute: bool,
        attr: AttrIndex,
    ) -> Self {
        Self {
            index,
            base: range.start,
            limit: range.last(),
            sh: RbarSh::NonShareable,
            ap,
            execute,
            attr,
        }
    }

    pub const fn rbar(&self) -> RbarVal {
        RbarVal::const_default()
            .with_xn(!self.execute)
            .with_ap(self.ap)
            .with_sh(self.sh)
            .with_base(self.base)
    }

    pub const fn rlar(&self) -> RlarVal {
        RlarVal::const_default()
            .with_en(true)
            .with_attrindx(self.attr as u8)
            .with_pxn(false)
            .with_limit(self.limit)
    }
}

/// The fixed four region table derived from the image layout.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ProtectionPolicy {
    regions: [ProtectionRegion; NUM_REGIONS],
}

impl ProtectionPolicy {
    /// Build the region table for `layout`.
    ///
    /// Fails if the layout or the configured peripheral aperture breaks an
    /// alignment or ordering rule.
    pub fn new<C: CortexMProtectionConfigInterface>(layout: &MemoryLayout) -> Result<Self> {
        layout.validate()?;

        let aperture_base = C::PERIPHERAL_APERTURE_BASE;
        let aperture_limit = C::PERIPHERAL_APERTURE_LIMIT;
        check_aligned(Boundary::PeripheralBase, aperture_base)?;
        check_aligned(Boundary::PeripheralLimit, aperture_limit.wrapping_add(1))?;
        if aperture_base >= aperture_limit {
            return Err(Error::BoundaryOrder {
                lower: Boundary::PeripheralBase,
                upper: Boundary::PeripheralLimit,
            });
        }
        // Sections ascend, so RAM ending below the aperture keeps all of
        // them out of it.
        if layout.ram_top > aperture_base {
            return Err(Error::BoundaryOrder {
                lower: Boundary::RamTop,
                upper: Boundary::PeripheralBase,
            });
        }

        let peripherals = ProtectionRegion {
            index: RegionIndex::Peripherals,
            base: aperture_base,
            limit: aperture_limit,
            sh: RbarSh::NonShareable,
            ap: RbarAp::RwPrivileged,
            execute: false,
            attr: AttrIndex::DeviceMemory,
        };

        Ok(Self {
            regions: [
                ProtectionRegion::new(
                    RegionIndex::Code,
                    layout.code(),
                    RbarAp::RoPrivileged,
                    true,
                    AttrIndex::NormalMemory,
                ),
                ProtectionRegion::new(
                    RegionIndex::Rodata,
                    layout.rodata(),
                    RbarAp::RoPrivileged,
                    false,
                    AttrIndex::NormalMemory,
                ),
                ProtectionRegion::new(
                    RegionIndex::Ram,
                    layout.ram(),
                    RbarAp::RwPrivileged,
                    false,
                    AttrIndex::NormalMemory,
                ),
                peripherals,
            ],
        })
    }

    pub fn regions(&self) -> &[ProtectionRegion; NUM_REGIONS] {
        &self.regions
    }

    pub fn region(&self, index: RegionIndex) -> &ProtectionRegion {
        &self.regions[index as usize]
    }

    /// Write the region table to the MPU and enable it.
    ///
    /// The MPU is disabled while the table is rewritten and the change is
    /// bracketed with DSB/ISB on both sides.  HardFault and NMI keep using
    /// the MPU; background accesses outside the table fault.
    pub(crate) fn write<A: RegisterAccess + ?Sized>(&self, io: &mut A) {
        let mut mpu = Regs::get().mpu;

        mpu.ctrl.write(io, CtrlVal::default());
        io.dsb();
        io.isb();

        mpu.mair0.write(io, mair0());
        mpu.mair1.write(io, mair1());

        for region in self.regions.iter() {
            mpu.rnr
                .write(io, RnrVal::default().with_region(region.index as u8));
            mpu.rbar.write(io, region.rbar());
            mpu.rlar.write(io, region.rlar());
        }

        mpu.ctrl.write(
            io,
            CtrlVal::default()
                .with_enable(true)
                .with_hfnmiena(true)
                .with_privdefena(false),
        );
        io.dsb();
        io.isb();

        pw_log::info!("MPU enabled with {} regions", NUM_REGIONS);
        self.dump();
    }

    /// Log the details of the region table.
    pub fn dump(&self) {
        for region in self.regions.iter() {
            pw_log::debug!(
                "{:?}: {:#010x}-{:#010x} rbar {:#010x} rlar {:#010x}",
                region.index,
                region.base as usize,
                region.limit as usize,
                region.rbar().0 as usize,
                region.rlar().0 as usize
            );
        }
    }
}

/// Check that the MPU can hold the policy's regions.
pub fn check_mpu<A: RegisterAccess + ?Sized>(io: &A) -> Result<()> {
    let implemented = Regs::get().mpu._type.read(io).dregion();
    if implemented < MIN_MPU_REGIONS {
        return Err(Error::InsufficientMpuRegions { implemented });
    }
    Ok(())
}

/// Compute the region table for `layout`, program it and enable the MPU.
///
/// Nothing is written unless every check passes.
pub fn configure<C, A>(io: &mut A, layout: &MemoryLayout) -> Result<ProtectionPolicy>
where
    C: CortexMProtectionConfigInterface,
    A: RegisterAccess + ?Sized,
{
    let policy = ProtectionPolicy::new::<C>(layout)?;
    check_mpu(&*io)?;

    policy.write(io);
    Ok(policy)
}

#[cfg(test)]
mod tests {
    use regs::RW;

    use super::*;
    use crate::sim::{Event, SimulatedRegisters};

    struct TestConfig;
    impl CortexMProtectionConfigInterface for TestConfig {}

    struct LowAperture;
    impl CortexMProtectionConfigInterface for LowAperture {
        const PERIPHERAL_APERTURE_BASE: u32 = 0x0000_8000;
    }

    struct UnalignedAperture;
    impl CortexMProtectionConfigInterface for UnalignedAperture {
        const PERIPHERAL_APERTURE_LIMIT: u32 = 0xdfff_fff0;
    }

    const LAYOUT: MemoryLayout = MemoryLayout {
        code_start: 0x1000,
        code_end: 0x2000,
        rodata_start: 0x2000,
        rodata_end: 0x2400,
        data_start: 0x2400,
        ram_top: 0x10000,
    };

    #[test]
    fn mair_encodings() {
        assert_eq!(mair0().0, 0x0404_0477);
        assert_eq!(mair1().0, 0x0404_0404);
    }

    #[test]
    fn region_table_matches_policy() {
        let policy = ProtectionPolicy::new::<TestConfig>(&LAYOUT).unwrap();

        let code = policy.region(RegionIndex::Code);
        assert_eq!((code.base, code.limit), (0x1000, 0x1fff));
        assert_eq!(code.rbar().0, 0x1004);
        assert_eq!(code.rlar().0, 0x1fe1);

        let rodata = policy.region(RegionIndex::Rodata);
        assert_eq!(rodata.rbar().0, 0x2005);
        assert_eq!(rodata.rlar().0, 0x23e1);

        let ram = policy.region(RegionIndex::Ram);
        assert_eq!(ram.rbar().0, 0x2401);
        assert_eq!(ram.rlar().0, 0xffe1);

        let peripherals = policy.region(RegionIndex::Peripherals);
        assert_eq!(peripherals.rbar().0, 0x4000_0001);
        assert_eq!(peripherals.rlar().0, 0xdfff_ffe3);
    }

    #[test]
    fn region_fields_decode_back() {
        let policy = ProtectionPolicy::new::<TestConfig>(&LAYOUT).unwrap();
        for region in policy.regions() {
            let rbar = region.rbar();
            let rlar = region.rlar();
            assert_eq!(rbar.ap(), Some(region.ap));
            assert_eq!(rbar.sh(), Some(RbarSh::NonShareable));
            assert_eq!(rbar.xn(), !region.execute);
            assert!(rlar.en());
            assert_eq!(rlar.attrindx(), region.attr as u8);
        }
    }

    #[test]
    fn aperture_overlapping_ram_is_rejected() {
        assert_eq!(
            ProtectionPolicy::new::<LowAperture>(&LAYOUT),
            Err(Error::BoundaryOrder {
                lower: Boundary::RamTop,
                upper: Boundary::PeripheralBase,
            })
        );
    }

    #[test]
    fn unaligned_aperture_is_rejected() {
        assert_eq!(
            ProtectionPolicy::new::<UnalignedAperture>(&LAYOUT),
            Err(Error::UnalignedBoundary {
                boundary: Boundary::PeripheralLimit,
                addr: 0xdfff_fff1,
            })
        );
    }

    #[test]
    fn configure_programs_every_region() {
        let mut sim = SimulatedRegisters::cortex_m33(4, &[0, 1]);
        let policy = configure::<TestConfig, _>(&mut sim, &LAYOUT).unwrap();

        for region in policy.regions() {
            assert_eq!(
                sim.mpu_region(region.index as usize),
                (region.rbar(), region.rlar())
            );
        }
        assert_eq!(sim.value(Mair0::ADDR), 0x0404_0477);
        assert_eq!(sim.value(Mair1::ADDR), 0x0404_0404);
        assert_eq!(sim.value(Ctrl::ADDR), 0b011);
    }

    #[test]
    fn configure_brackets_changes_with_barriers() {
        let mut sim = SimulatedRegisters::cortex_m33(4, &[0, 1]);
        configure::<TestConfig, _>(&mut sim, &LAYOUT).unwrap();

        let events = sim.events();
        assert_eq!(
            events[..3],
            [
                Event::Write {
                    addr: Ctrl::ADDR,
                    val: 0
                },
                Event::Dsb,
                Event::Isb,
            ]
        );
        assert_eq!(
            events[events.len() - 3..],
            [
                Event::Write {
                    addr: Ctrl::ADDR,
                    val: 0b011
                },
                Event::Dsb,
                Event::Isb,
            ]
        );
        // ctrl, mair0, mair1 and three writes per region.
        assert_eq!(sim.writes().len(), 2 + 2 + 3 * NUM_REGIONS);
    }

    #[test]
    fn invalid_layout_writes_nothing() {
        let mut sim = SimulatedRegisters::cortex_m33(4, &[0, 1]);
        let layout = MemoryLayout {
            code_end: 0x2400,
            ..LAYOUT
        };

        assert!(configure::<TestConfig, _>(&mut sim, &layout).is_err());
        assert!(sim.events().is_empty());
    }

    #[test]
    fn small_mpu_writes_nothing() {
        let mut sim = SimulatedRegisters::cortex_m33(4, &[0, 1]).with_mpu_regions(2);

        assert_eq!(
            configure::<TestConfig, _>(&mut sim, &LAYOUT),
            Err(Error::InsufficientMpuRegions { implemented: 2 })
        );
        assert!(sim.events().is_empty());
    }
}
