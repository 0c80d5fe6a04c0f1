//! Driver selection: maps problem descriptors to one execution strategy.
//!
//! The selection is a priority-ordered decision over overlapping conditions
//! (zone count, time-integration mode, coupling flag). Instead of an if/else
//! cascade the priority order is an explicit, testable artifact: an ordered
//! table of (predicate, kind) pairs evaluated first-match-wins, whose final
//! entry always matches. Selection is therefore a total function — no input
//! can fall through unmatched, and any new problem shape must extend the
//! table explicitly.
//!
//! What a driver does once selected is out of scope here; the four concrete
//! drivers carry only their zone/dimension bookkeeping behind the [`Driver`]
//! capability set (run to completion, then finalize and release).

use crate::config::{ProblemDescriptor, UnsteadyMode};
use crate::error::HelmError;
use crate::group::ProcessGroup;

/// Identifier of the execution strategy governing a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverKind {
    SingleZone,
    Spectral,
    Fsi,
    MultiZone,
}

/// Inputs the dispatch decision is made over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriverInputs {
    pub n_zones: usize,
    pub unsteady: UnsteadyMode,
    pub fsi: bool,
}

impl DriverInputs {
    pub fn from_descriptor(descriptor: &ProblemDescriptor, n_zones: usize) -> Self {
        DriverInputs {
            n_zones,
            unsteady: descriptor.unsteady,
            fsi: descriptor.fsi_simulation,
        }
    }
}

fn single_zone(inputs: &DriverInputs) -> bool {
    inputs.n_zones == 1
}

// Spectral "zones" are time instances, not physical domains, so this applies
// even when the zone count exceeds one.
fn time_spectral(inputs: &DriverInputs) -> bool {
    inputs.unsteady == UnsteadyMode::TimeSpectral
}

// Coupling is only honored for exactly two zones; three or more fall through
// to the general multi-zone strategy.
fn two_zone_fsi(inputs: &DriverInputs) -> bool {
    inputs.n_zones == 2 && inputs.fsi
}

fn always(_inputs: &DriverInputs) -> bool {
    true
}

/// Ordered dispatch table; first match wins, last entry is the catch-all.
pub const DISPATCH_TABLE: &[(fn(&DriverInputs) -> bool, DriverKind)] = &[
    (single_zone, DriverKind::SingleZone),
    (time_spectral, DriverKind::Spectral),
    (two_zone_fsi, DriverKind::Fsi),
    (always, DriverKind::MultiZone),
];

/// Selects the execution strategy for `inputs`.
///
/// Total and deterministic: every process given identical inputs selects the
/// same kind with no cross-process coordination.
pub fn select_driver(inputs: &DriverInputs) -> DriverKind {
    for (predicate, kind) in DISPATCH_TABLE {
        if predicate(inputs) {
            return *kind;
        }
    }
    // The table ends in a catch-all.
    unreachable!("dispatch table has no catch-all entry")
}

/// A long-lived execution strategy.
///
/// External callers invoke exactly two capabilities: start the run, then
/// finalize and release.
pub trait Driver {
    fn kind(&self) -> DriverKind;
    /// Run the simulation to completion.
    fn run(&mut self) -> Result<(), HelmError>;
    /// Post-process results and release the strategy.
    fn finalize(self: Box<Self>) -> Result<(), HelmError>;
}

/// Strategy for a single physical zone.
#[derive(Debug)]
pub struct SingleZoneDriver {
    pub n_dim: usize,
}

impl Driver for SingleZoneDriver {
    fn kind(&self) -> DriverKind {
        DriverKind::SingleZone
    }
    fn run(&mut self) -> Result<(), HelmError> {
        Ok(())
    }
    fn finalize(self: Box<Self>) -> Result<(), HelmError> {
        Ok(())
    }
}

/// Strategy for the time-spectral scheme; zones are time instances.
#[derive(Debug)]
pub struct SpectralDriver {
    pub n_instances: usize,
    pub n_dim: usize,
}

impl Driver for SpectralDriver {
    fn kind(&self) -> DriverKind {
        DriverKind::Spectral
    }
    fn run(&mut self) -> Result<(), HelmError> {
        Ok(())
    }
    fn finalize(self: Box<Self>) -> Result<(), HelmError> {
        Ok(())
    }
}

/// Strategy for two-way fluid-structure coupling over exactly two zones.
#[derive(Debug)]
pub struct FsiDriver {
    pub n_dim: usize,
}

impl FsiDriver {
    /// Fails unless exactly two zones are configured; there is no fallback
    /// strategy after selection, so the caller treats this as fatal.
    pub fn new(n_zones: usize, n_dim: usize) -> Result<Self, HelmError> {
        if n_zones != 2 {
            return Err(HelmError::FsiZoneCount { n_zones });
        }
        Ok(FsiDriver { n_dim })
    }
}

impl Driver for FsiDriver {
    fn kind(&self) -> DriverKind {
        DriverKind::Fsi
    }
    fn run(&mut self) -> Result<(), HelmError> {
        Ok(())
    }
    fn finalize(self: Box<Self>) -> Result<(), HelmError> {
        Ok(())
    }
}

/// General multi-physics strategy; the default fallback.
#[derive(Debug)]
pub struct MultiZoneDriver {
    pub n_zones: usize,
    pub n_dim: usize,
}

impl Driver for MultiZoneDriver {
    fn kind(&self) -> DriverKind {
        DriverKind::MultiZone
    }
    fn run(&mut self) -> Result<(), HelmError> {
        Ok(())
    }
    fn finalize(self: Box<Self>) -> Result<(), HelmError> {
        Ok(())
    }
}

/// Selects and constructs the one strategy object for this run.
///
/// Logs the choice on the master rank only. Construction failure is fatal to
/// the caller; there is no fallback strategy.
pub fn build_driver<G: ProcessGroup + ?Sized>(
    group: &G,
    descriptor: &ProblemDescriptor,
    n_zones: usize,
    n_dim: usize,
) -> Result<Box<dyn Driver>, HelmError> {
    let inputs = DriverInputs::from_descriptor(descriptor, n_zones);
    let kind = select_driver(&inputs);
    if group.is_master() {
        let name = match kind {
            DriverKind::SingleZone => "single-zone",
            DriverKind::Spectral => "spectral-method",
            DriverKind::Fsi => "fluid-structure interaction",
            DriverKind::MultiZone => "multi-zone",
        };
        log::info!("instantiating a {name} driver for the problem");
    }
    let driver: Box<dyn Driver> = match kind {
        DriverKind::SingleZone => Box::new(SingleZoneDriver { n_dim }),
        DriverKind::Spectral => Box::new(SpectralDriver {
            n_instances: descriptor.n_time_instances,
            n_dim,
        }),
        DriverKind::Fsi => Box::new(FsiDriver::new(n_zones, n_dim)?),
        DriverKind::MultiZone => Box::new(MultiZoneDriver { n_zones, n_dim }),
    };
    Ok(driver)
}
