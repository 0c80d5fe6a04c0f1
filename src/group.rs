//! Process-group façade over the distributed runtime.
//!
//! Everything collective in this crate (barriers, whole-group aborts) goes
//! through the [`ProcessGroup`] trait so components take the group as an
//! explicit parameter instead of reading ambient global state. That keeps the
//! diagnostics and abort paths testable with a size-1 [`SoloGroup`] or a
//! thread-backed [`LocalGroup`]; production runs use [`MpiGroup`] behind the
//! `mpi-support` feature.

use std::sync::Arc;
use std::sync::Barrier;

/// Rank of the process responsible for singleton work (headers, banners).
pub const MASTER_RANK: usize = 0;

/// A fixed-size group of cooperating processes with a working barrier.
///
/// Size is known at start; there is no dynamic membership. `barrier` has no
/// timeout: a member that cannot reach it must call [`ProcessGroup::abort`]
/// rather than silently stall its peers.
pub trait ProcessGroup: Send + Sync {
    /// This process's ordinal rank in `[0, size)`.
    fn rank(&self) -> usize;
    /// Number of processes in the group.
    fn size(&self) -> usize;
    /// Block until every member of the group has reached this call.
    fn barrier(&self);
    /// Terminate the entire group, not just the calling process.
    fn abort(&self, code: i32) -> !;

    /// Whether this process holds the master rank.
    fn is_master(&self) -> bool {
        self.rank() == MASTER_RANK
    }
}

/// Log the error and terminate the whole group.
///
/// The single funnel for unrecoverable input and I/O conditions: none of them
/// is retryable, and a process that exited alone would leave its peers
/// blocked at the next barrier.
pub fn collective_abort<G: ProcessGroup + ?Sized>(group: &G, err: &crate::error::HelmError) -> ! {
    log::error!("rank {}: fatal: {err}", group.rank());
    group.abort(1)
}

/// Size-1 group for serial runs and unit tests. Barrier is a no-op.
#[derive(Clone, Debug, Default)]
pub struct SoloGroup;

impl ProcessGroup for SoloGroup {
    fn rank(&self) -> usize {
        0
    }
    fn size(&self) -> usize {
        1
    }
    fn barrier(&self) {}
    fn abort(&self, code: i32) -> ! {
        std::process::exit(code)
    }
}

/// Thread-backed group: one member per thread, sharing a real barrier.
///
/// Test backend only. `abort` panics in the calling thread instead of killing
/// the process, so a test harness can observe the failure.
#[derive(Clone, Debug)]
pub struct LocalGroup {
    rank: usize,
    size: usize,
    barrier: Arc<Barrier>,
}

impl LocalGroup {
    /// Creates one handle per member, all sharing the same barrier.
    pub fn split(size: usize) -> Vec<LocalGroup> {
        assert!(size > 0, "group size must be positive");
        let barrier = Arc::new(Barrier::new(size));
        (0..size)
            .map(|rank| LocalGroup {
                rank,
                size,
                barrier: Arc::clone(&barrier),
            })
            .collect()
    }
}

impl ProcessGroup for LocalGroup {
    fn rank(&self) -> usize {
        self.rank
    }
    fn size(&self) -> usize {
        self.size
    }
    fn barrier(&self) {
        self.barrier.wait();
    }
    fn abort(&self, code: i32) -> ! {
        panic!("LocalGroup rank {} aborted with code {code}", self.rank)
    }
}

// --- MPI backend (feature = "mpi-support") ---
#[cfg(feature = "mpi-support")]
mod mpi_backend {
    use super::ProcessGroup;
    use mpi::topology::SimpleCommunicator;
    use mpi::traits::*;

    /// World-communicator group for production distributed runs.
    ///
    /// Holds the MPI universe so the runtime stays initialized for the
    /// lifetime of the group; teardown happens on drop, after the last
    /// collective operation of this crate.
    pub struct MpiGroup {
        _universe: mpi::environment::Universe,
        world: SimpleCommunicator,
    }

    impl MpiGroup {
        /// Initializes MPI and binds to the world communicator.
        ///
        /// # Panics
        /// Panics if MPI was already initialized in this process.
        pub fn world() -> Self {
            let universe = mpi::initialize().expect("MPI already initialized");
            let world = universe.world();
            MpiGroup {
                _universe: universe,
                world,
            }
        }
    }

    impl ProcessGroup for MpiGroup {
        fn rank(&self) -> usize {
            self.world.rank() as usize
        }
        fn size(&self) -> usize {
            self.world.size() as usize
        }
        fn barrier(&self) {
            self.world.barrier();
        }
        fn abort(&self, code: i32) -> ! {
            self.world.abort(code)
        }
    }
}

#[cfg(feature = "mpi-support")]
pub use mpi_backend::MpiGroup;
