pub mod error;
pub mod roster;
pub mod selection;
pub mod session;
pub mod snapshot;
pub mod timer;
pub mod types;

pub use error::{SetupError, SnapshotError, TransitionError};
pub use session::{transition, Command, SessionState};
pub use snapshot::{Restored, RestoreOutcome, SnapshotSource, SnapshotStore};
pub use timer::PendingAdvance;
pub use types::{Participant, Prize, Stage, Winner};
