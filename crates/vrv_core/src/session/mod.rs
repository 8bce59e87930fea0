mod boundary;
mod error;
mod events;
mod lifecycle;
mod payloads;
mod simulated;
mod state;


pub use boundary::{BoundaryError, BoundaryReply, HostBoundary, HostCallback};
pub use error::{SessionError, SessionErrorKind, SessionResult};
pub use events::{ChannelObserver, EventBus, SessionEvent, SessionObserver, SubscriptionId};
pub use lifecycle::{SessionLifecycle, DEFAULT_SCORE_METADATA};
pub use payloads::{EquippedItem, ExternalSessionData};
pub use simulated::SimulatedHost;
pub use state::SessionPhase;
