pub mod generation;
pub mod queue;
pub mod scheduler;

pub use generation::GenerationTracker;
pub use scheduler::IncrementalScheduler;
