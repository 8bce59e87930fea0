mod dispatch;
mod line_host;
mod wire;

pub use dispatch::{dispatch_host_line, DispatchOutcome};
pub use line_host::LineHost;
pub use wire::{
    parse_callback, parse_wire_line, HostRequest, LineChannel, ParsedLine, WireError,
    CONTROL_PREFIX, PROTOCOL_VERSION, TELEMETRY_PREFIX,
};
