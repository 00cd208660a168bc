/// Wall-clock time sources for meter ticks.
pub mod clock;
pub mod scheduler;
pub mod store;
/// Fleet-wide aggregates over a snapshot.
pub mod summary;

pub use clock::{Clock, FixedClock, SystemClock};
pub use scheduler::Scheduler;
pub use store::StateStore;
pub use summary::Summary;
