pub mod scoring;
pub mod session;
pub mod state;

pub use scoring::thresholds;
pub use session::{SessionParams, SessionView, TestSession};
