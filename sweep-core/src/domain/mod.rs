//! Domain layer: pure sweep data and logic, no I/O.

pub mod aggregate;
pub mod audit;
pub mod model;
pub mod partition;
pub mod state;

pub use aggregate::{compute_aggregate, SweepAggregate};
pub use model::{
    HardwareSignedTransaction, PreparedSweep, SignatureRole, SweepCandidate, SweepMode, SweepSession, SweepTransaction,
};
pub use partition::{hardware_subset, merge_hardware_signatures};
pub use state::{SweepStage, SweepState};
