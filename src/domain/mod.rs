//! Domain Layer
//!
//! Plain value types shared by the pipeline stages, plus the ports the
//! pipeline talks through. Nothing here spawns processes or touches disk.

mod build_result;
mod change;
mod policy;
pub mod ports;

pub use build_result::{BuildOutcome, BuildResult};
pub use change::{ChangeKind, FileChangeEvent};
pub use policy::OnAccept;
pub use ports::{BuildExecutor, WatchHandle};
