pub mod events;
pub mod logging;
pub mod pacing;
pub mod session;
pub mod table;

pub use events::{EventBus, EventSubscription, GameEvent};
pub use logging::{init_logging, init_test_logging, LogEntry, TestLogSubscriber};
pub use pacing::{Continuation, Pacing};
pub use session::{
    ContinuationOutcome, GameSession, SessionConfig, SessionError, SessionId, SessionManager,
};
pub use table::{run_table, TableSummary};
