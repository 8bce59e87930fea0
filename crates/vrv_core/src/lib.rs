pub mod config;
pub mod host;
pub mod inventory;
pub mod session;

pub use config::{ConfigError, HostMode, SessionConfig, DEFAULT_GAME_ID};
pub use host::{dispatch_host_line, DispatchOutcome, LineHost};
pub use inventory::{parse_inventory_response, InventoryItem, InventoryResponse, ItemAttribute};
pub use session::{
    BoundaryError, BoundaryReply, ChannelObserver, EquippedItem, HostBoundary, HostCallback,
    SessionError, SessionErrorKind, SessionEvent, SessionLifecycle, SessionObserver,
    SessionPhase, SessionResult, SimulatedHost, SubscriptionId, DEFAULT_SCORE_METADATA,
};

