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

//! DWT comparator discovery and allocation.
//!
//! Comparators are grouped in adjacent pairs `(2n, 2n + 1)`.  A pair whose
//! second comparator can act as a data address limit watches a whole
//! address range.  Two such pairs are armed:
//!
//! * [`Duty::CodeIntegrity`] traps any access to the code region.
//! * [`Duty::DebugRegisters`] traps writes to the DWT through the Debug
//!   Control Block, so the first duty can not be quietly reprogrammed.
//!
//! Both raise the DebugMonitor exception.

use bitflags::bitflags;
use regs::RegisterAccess;

use crate::error::{DebugUnit, Error, Result};
use crate::layout::AddressRange;
use crate::regs::Regs;
use crate::regs::dcb::{DCB_BASE, DCB_SIZE};
use crate::regs::dwt::*;

/// Number of candidate comparator pairs.
pub const NUM_PAIRS: usize = Comp::COUNT / 2;

/// Fewest comparators the policy can run with.
pub const MIN_COMPARATORS: u8 = 4;

/// Fewest linkable pairs the policy can run with, one per duty.
pub const MIN_LINKABLE_PAIRS: usize = 2;

/// DWT base through the last Debug Control Block register.
pub const DEBUG_REGISTERS: AddressRange = AddressRange::new(DWT_BASE, DCB_BASE + DCB_SIZE);

bitflags! {
    /// Kinds of data access a watchpoint traps.
    #[derive(Clone, Copy, Debug, Eq, PartialEq)]
    pub struct WatchAccess: u8 {
        const READ = 1 << 0;
        const WRITE = 1 << 1;
    }
}

impl WatchAccess {
    /// `FUNCTION.MATCH` encoding trapping these accesses on the base
    /// comparator of a linked pair.
    pub fn function_match(self) -> FunctionMatch {
        if self.contains(Self::READ | Self::WRITE) {
            FunctionMatch::DataAddress
        } else if self.contains(Self::WRITE) {
            FunctionMatch::DataAddressWrite
        } else if self.contains(Self::READ) {
            FunctionMatch::DataAddressRead
        } else {
            FunctionMatch::Disabled
        }
    }
}

/// Monitoring duties, in allocation order.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Duty {
    CodeIntegrity,
    DebugRegisters,
}

impl Duty {
    pub fn access(self) -> WatchAccess {
        match self {
            Duty::CodeIntegrity => WatchAccess::READ | WatchAccess::WRITE,
            Duty::DebugRegisters => WatchAccess::WRITE,
        }
    }
}

/// Two adjacent comparators that may be linked into a range watchpoint.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ComparatorPair {
    pub index: usize,
    /// `FUNCTION.ID` of the second comparator advertises limit matching.
    pub linkable: bool,
}

impl ComparatorPair {
    pub const fn new(index: usize) -> Self {
        Self {
            index,
            linkable: false,
        }
    }

    /// Comparator holding the range base.
    pub const fn comp_a(&self) -> Comp {
        Regs::get().dwt.comp(2 * self.index)
    }

    /// Comparator holding the inclusive range limit.
    pub const fn comp_b(&self) -> Comp {
        Regs::get().dwt.comp(2 * self.index + 1)
    }

    pub const fn func_a(&self) -> Function {
        Regs::get().dwt.function(2 * self.index)
    }

    pub const fn func_b(&self) -> Function {
        Regs::get().dwt.function(2 * self.index + 1)
    }

    /// Watch `range` for `access`, raising a debug event on a match.
    ///
    /// The limit comparator is set up first so the base comparator never
    /// matches as a single address watchpoint.
    fn arm<A: RegisterAccess + ?Sized>(&self, io: &mut A, range: AddressRange, access: WatchAccess) {
        self.comp_a().write(io, CompVal(range.start));
        self.comp_b().write(io, CompVal(range.last()));
        self.func_b().write(
            io,
            FunctionVal::const_default()
                .with_match_(FunctionMatch::DataAddressLimit)
                .with_action(FunctionAction::TriggerOnly),
        );
        self.func_a().write(
            io,
            FunctionVal::const_default()
                .with_action(FunctionAction::DebugEvent)
                .with_match_(access.function_match()),
        );
    }
}

/// The candidate pairs of the implemented comparators, in ascending order.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ComparatorPairs {
    pairs: [ComparatorPair; NUM_PAIRS],
    len: usize,
}

impl ComparatorPairs {
    /// Candidate pairs for `num_comparators`, none yet known to be linkable.
    pub fn candidates(num_comparators: u8) -> Self {
        let mut pairs = [ComparatorPair::new(0); NUM_PAIRS];
        for (index, pair) in pairs.iter_mut().enumerate() {
            *pair = ComparatorPair::new(index);
        }
        Self {
            pairs,
            len: (usize::from(num_comparators) / 2).min(NUM_PAIRS),
        }
    }

    /// Read `DWT_CTRL.NUMCOMP` and the capabilities of every pair.
    pub fn discover<A: RegisterAccess + ?Sized>(io: &A) -> Self {
        let num_comparators = Regs::get().dwt.ctrl.read(io).numcomp();
        let mut pairs = Self::candidates(num_comparators);
        for pair in pairs.pairs[..pairs.len].iter_mut() {
            pair.linkable = pair.func_b().read(io).supports_linking();
        }
        pairs
    }

    pub fn as_slice(&self) -> &[ComparatorPair] {
        &self.pairs[..self.len]
    }

    /// First linkable pair with an index of at least `from`.
    pub fn next_linkable(&self, from: usize) -> Option<ComparatorPair> {
        self.as_slice()
            .iter()
            .skip(from)
            .find(|pair| pair.linkable)
            .copied()
    }

    pub fn linkable_count(&self) -> usize {
        self.as_slice().iter().filter(|pair| pair.linkable).count()
    }

    /// Assign the duties to linkable pairs by one ascending scan.
    ///
    /// The debug register duty continues the scan after the code duty's
    /// pair, so the two never share comparators.
    pub fn allocate(&self) -> Result<Allocation> {
        let insufficient = Error::InsufficientLinkablePairs {
            found: self.linkable_count(),
        };
        let code = self.next_linkable(0).ok_or(insufficient)?;
        let debug_registers = self.next_linkable(code.index + 1).ok_or(insufficient)?;
        Ok(Allocation {
            code,
            debug_registers,
        })
    }
}

/// Pairs assigned to each duty.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Allocation {
    pub code: ComparatorPair,
    pub debug_registers: ComparatorPair,
}

impl Allocation {
    pub fn pair(&self, duty: Duty) -> ComparatorPair {
        match duty {
            Duty::CodeIntegrity => self.code,
            Duty::DebugRegisters => self.debug_registers,
        }
    }

    /// Duty served by `comparator`, if any.
    pub fn duty_of(&self, comparator: usize) -> Option<Duty> {
        [Duty::CodeIntegrity, Duty::DebugRegisters]
            .into_iter()
            .find(|duty| self.pair(*duty).index == comparator / 2)
    }

    /// Duty of the lowest comparator set in the `matched` mask.
    pub fn first_duty(&self, matched: u16) -> Option<Duty> {
        (0..Comp::COUNT)
            .filter(|comparator| matched & (1u16 << comparator) != 0)
            .find_map(|comparator| self.duty_of(comparator))
    }

    /// First duty whose pair reports a match.
    ///
    /// Reads, and so clears, the `MATCHED` flag of every comparator.
    pub fn triggered<A: RegisterAccess + ?Sized>(&self, io: &A) -> Option<Duty> {
        self.first_duty(matched_comparators(io))
    }

    pub fn dump(&self) {
        for duty in [Duty::CodeIntegrity, Duty::DebugRegisters] {
            let pair = self.pair(duty);
            pw_log::debug!(
                "{:?}: pair {} (comparators {}, {}) {:?}",
                duty,
                pair.index,
                2 * pair.index,
                2 * pair.index + 1,
                duty.access()
            );
        }
    }
}

/// Check the ROM table for the DWT and ITM.
pub fn check_units<A: RegisterAccess + ?Sized>(io: &A) -> Result<()> {
    let rom = Regs::get().rom_table;
    if !rom.dwt.read(io).present() {
        return Err(Error::UnitNotImplemented(DebugUnit::Dwt));
    }
    if !rom.itm.read(io).present() {
        return Err(Error::UnitNotImplemented(DebugUnit::Itm));
    }
    Ok(())
}

/// Bit mask of comparators whose `MATCHED` flag is set.
///
/// Reading clears the flags.
pub fn matched_comparators<A: RegisterAccess + ?Sized>(io: &A) -> u16 {
    let num_comparators = usize::from(Regs::get().dwt.ctrl.read(io).numcomp()).min(Comp::COUNT);
    let dwt = Regs::get().dwt;
    (0..num_comparators)
        .filter(|index| dwt.function(*index).read(io).matched())
        .fold(0u16, |mask, index| mask | (1u16 << index))
}

/// Discover the comparators and assign both duties without writing
/// anything.
pub fn plan<A: RegisterAccess + ?Sized>(io: &A) -> Result<Allocation> {
    check_units(io)?;

    let implemented = Regs::get().dwt.ctrl.read(io).numcomp();
    if implemented < MIN_COMPARATORS {
        return Err(Error::InsufficientComparators { implemented });
    }

    let pairs = ComparatorPairs::discover(io);
    pw_log::debug!(
        "DWT: {} comparators, {} linkable pairs",
        implemented as usize,
        pairs.linkable_count()
    );
    pairs.allocate()
}

/// Enable the DebugMonitor exception and program both duties.
pub(crate) fn arm<A: RegisterAccess + ?Sized>(
    io: &mut A,
    allocation: &Allocation,
    code: AddressRange,
) {
    pw_assert::ne!(allocation.code.index, allocation.debug_registers.index);

    let mut demcr = Regs::get().dcb.demcr;
    let val = demcr.read(&*io).with_trcena(true).with_mon_en(true);
    demcr.write(io, val);

    io.dsb();
    io.isb();
    allocation
        .code
        .arm(io, code, Duty::CodeIntegrity.access());
    allocation
        .debug_registers
        .arm(io, DEBUG_REGISTERS, Duty::DebugRegisters.access());
    io.dsb();
    io.isb();

    pw_log::info!(
        "Watchpoints armed on pairs {} and {}",
        allocation.code.index,
        allocation.debug_registers.index
    );
    allocation.dump();
}

/// Discover the comparators, assign both duties and arm them.
///
/// Nothing is written unless the hardware meets every minimum.
pub fn configure<A: RegisterAccess + ?Sized>(io: &mut A, code: AddressRange) -> Result<Allocation> {
    let allocation = plan(&*io)?;
    arm(io, &allocation, code);
    Ok(allocation)
}

#[cfg(test)]
mod tests {
    use regs::RW;

    use super::*;
    use crate::regs::dcb::Demcr;
    use crate::sim::{Event, SimulatedRegisters};

    const CODE: AddressRange = AddressRange::new(0x1000, 0x2000);

    #[test]
    fn debug_register_range_spans_dwt_through_dcb() {
        assert_eq!(DEBUG_REGISTERS.start, 0xe000_1000);
        assert_eq!(DEBUG_REGISTERS.last(), 0xe000_ee0b);
    }

    #[test]
    fn access_maps_to_match_encoding() {
        assert_eq!(
            (WatchAccess::READ | WatchAccess::WRITE).function_match() as u8,
            0x4
        );
        assert_eq!(WatchAccess::WRITE.function_match() as u8, 0x5);
        assert_eq!(WatchAccess::READ.function_match() as u8, 0x6);
        assert_eq!(WatchAccess::empty().function_match(), FunctionMatch::Disabled);
    }

    #[test]
    fn candidates_cover_implemented_comparators() {
        assert_eq!(ComparatorPairs::candidates(4).as_slice().len(), 2);
        assert_eq!(ComparatorPairs::candidates(5).as_slice().len(), 2);
        assert_eq!(ComparatorPairs::candidates(15).as_slice().len(), 7);
        assert_eq!(ComparatorPairs::candidates(0).as_slice().len(), 0);
    }

    #[test]
    fn discover_reads_limit_capability() {
        let sim = SimulatedRegisters::cortex_m33(8, &[1, 3]);
        let pairs = ComparatorPairs::discover(&sim);

        let linkable: Vec<bool> = pairs.as_slice().iter().map(|pair| pair.linkable).collect();
        assert_eq!(linkable, [false, true, false, true]);
        assert_eq!(pairs.linkable_count(), 2);
    }

    #[test]
    fn discover_ignores_unimplemented_comparators() {
        // Pair 5 advertises linking but only 8 comparators exist.
        let sim = SimulatedRegisters::cortex_m33(8, &[1, 5]);
        let pairs = ComparatorPairs::discover(&sim);

        assert_eq!(pairs.linkable_count(), 1);
        assert_eq!(
            pairs.allocate(),
            Err(Error::InsufficientLinkablePairs { found: 1 })
        );
    }

    #[test]
    fn allocation_skips_pairs_that_can_not_link() {
        let mut sim = SimulatedRegisters::cortex_m33(15, &[1, 3, 5]);
        let pairs = ComparatorPairs::discover(&sim);
        assert_eq!(pairs.as_slice().len(), 7);
        assert_eq!(pairs.linkable_count(), 3);

        let allocation = configure(&mut sim, CODE).unwrap();
        assert_eq!(allocation.code.index, 1);
        assert_eq!(allocation.debug_registers.index, 3);

        let spare = pairs.as_slice()[5];
        assert!(spare.linkable);
        for addr in [
            spare.comp_a().addr(),
            spare.comp_b().addr(),
            spare.func_a().addr(),
            spare.func_b().addr(),
        ] {
            assert_eq!(sim.first_write_to(addr), None);
        }
    }

    #[test]
    fn single_linkable_pair_takes_code_duty_then_fails() {
        let sim = SimulatedRegisters::cortex_m33(4, &[0]);
        let pairs = ComparatorPairs::discover(&sim);

        assert_eq!(pairs.next_linkable(0).map(|pair| pair.index), Some(0));
        assert_eq!(pairs.next_linkable(1), None);
        assert_eq!(
            pairs.allocate(),
            Err(Error::InsufficientLinkablePairs { found: 1 })
        );
    }

    #[test]
    fn configure_arms_both_duties() {
        let mut sim = SimulatedRegisters::cortex_m33(8, &[1, 3, 5]);
        let allocation = configure(&mut sim, CODE).unwrap();
        assert_eq!(allocation.code.index, 1);
        assert_eq!(allocation.debug_registers.index, 3);

        let (comp, function) = sim.comparator(2);
        assert_eq!(comp, 0x1000);
        assert_eq!(function.0 & 0x3f, 0x14);
        let (comp, function) = sim.comparator(3);
        assert_eq!(comp, 0x1fff);
        assert_eq!(function.match_(), Some(FunctionMatch::DataAddressLimit));
        assert_eq!(function.action(), Some(FunctionAction::TriggerOnly));

        let (comp, function) = sim.comparator(6);
        assert_eq!(comp, 0xe000_1000);
        assert_eq!(function.0 & 0x3f, 0x15);
        assert_eq!(sim.comparator(7).0, 0xe000_ee0b);

        // Pair 5 stays unconfigured.
        assert_eq!(sim.comparator(10).0, 0);
        assert_eq!(sim.comparator(10).1.match_(), Some(FunctionMatch::Disabled));

        let demcr = sim.demcr();
        assert!(demcr.trcena());
        assert!(demcr.mon_en());
    }

    #[test]
    fn limit_function_is_written_before_base_function() {
        let mut sim = SimulatedRegisters::cortex_m33(4, &[0, 1]);
        configure(&mut sim, CODE).unwrap();

        for pair in 0..2 {
            let pair = ComparatorPair::new(pair);
            let b = sim.first_write_to(pair.func_b().addr()).unwrap();
            let a = sim.first_write_to(pair.func_a().addr()).unwrap();
            assert!(b < a);
        }
    }

    #[test]
    fn demcr_is_updated_before_barrier_and_arming() {
        let mut sim = SimulatedRegisters::cortex_m33(4, &[0, 1]);
        configure(&mut sim, CODE).unwrap();

        let events = sim.events();
        let demcr = sim.first_write_to(Demcr::ADDR).unwrap();
        assert_eq!(events[demcr + 1], Event::Dsb);
        assert_eq!(events[demcr + 2], Event::Isb);
        assert_eq!(events[events.len() - 2..], [Event::Dsb, Event::Isb]);
    }

    #[test]
    fn demcr_update_preserves_other_bits() {
        let mut sim =
            SimulatedRegisters::cortex_m33(4, &[0, 1]).with_value(Demcr::ADDR, 1 << 0);
        configure(&mut sim, CODE).unwrap();

        assert_eq!(sim.demcr().0, (1 << 24) | (1 << 16) | 1);
    }

    #[test]
    fn missing_units_write_nothing() {
        let mut sim = SimulatedRegisters::cortex_m33(4, &[0, 1]).without_unit(DebugUnit::Dwt);
        assert_eq!(
            configure(&mut sim, CODE),
            Err(Error::UnitNotImplemented(DebugUnit::Dwt))
        );

        let mut sim = SimulatedRegisters::cortex_m33(4, &[0, 1]).without_unit(DebugUnit::Itm);
        assert_eq!(
            configure(&mut sim, CODE),
            Err(Error::UnitNotImplemented(DebugUnit::Itm))
        );
        assert!(sim.events().is_empty());
    }

    #[test]
    fn too_few_comparators_write_nothing() {
        let mut sim = SimulatedRegisters::cortex_m33(2, &[0]);
        assert_eq!(
            configure(&mut sim, CODE),
            Err(Error::InsufficientComparators { implemented: 2 })
        );
        assert!(sim.events().is_empty());
    }

    #[test]
    fn too_few_linkable_pairs_write_nothing() {
        let mut sim = SimulatedRegisters::cortex_m33(4, &[1]);
        assert_eq!(
            configure(&mut sim, CODE),
            Err(Error::InsufficientLinkablePairs { found: 1 })
        );
        assert!(sim.events().is_empty());
    }

    #[test]
    fn matched_flags_identify_duty() {
        let mut sim = SimulatedRegisters::cortex_m33(8, &[1, 3]);
        let allocation = configure(&mut sim, CODE).unwrap();
        assert_eq!(allocation.triggered(&sim), None);

        sim.trigger(6);
        assert_eq!(matched_comparators(&sim), 1 << 6);
        // The flag was consumed by the read above.
        assert_eq!(allocation.triggered(&sim), None);

        sim.trigger(7);
        assert_eq!(allocation.triggered(&sim), Some(Duty::DebugRegisters));
        assert_eq!(allocation.duty_of(2), Some(Duty::CodeIntegrity));
        assert_eq!(allocation.duty_of(0), None);
    }

    #[test]
    fn first_duty_ignores_comparators_outside_the_allocation() {
        let sim = SimulatedRegisters::cortex_m33(8, &[1, 3]);
        let allocation = ComparatorPairs::discover(&sim).allocate().unwrap();

        assert_eq!(allocation.first_duty(0), None);
        assert_eq!(allocation.first_duty(0b0000_0011), None);
        assert_eq!(allocation.first_duty(0b0100_0001), Some(Duty::DebugRegisters));
        assert_eq!(allocation.first_duty(0b1000_1000), Some(Duty::CodeIntegrity));
    }
}
