//! Application layer: orchestration across domain logic and infrastructure I/O.

pub mod completion;
pub mod lifecycle;
pub mod orchestrator;
pub mod signing_pipeline;

pub use completion::CompletionTracker;
pub use lifecycle::{CompositeObserver, NoopObserver, SweepLifecycleObserver};
pub use orchestrator::{SweepCollaborators, SweepOrchestrator};
pub use signing_pipeline::{SigningPhase, SigningPipeline};
