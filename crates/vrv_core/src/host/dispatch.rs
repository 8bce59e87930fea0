use tracing::{debug, warn};

use crate::session::SessionLifecycle;

use super::wire::{parse_callback, parse_wire_line, LineChannel};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    Handled,
    Ignored,
    /// An unprefixed line; the caller decides what it means.
    Passthrough(String),
}

pub fn dispatch_host_line(lifecycle: &mut SessionLifecycle, raw: &str) -> DispatchOutcome {
    let line = parse_wire_line(raw);
    match line.channel {
        LineChannel::Control => match parse_callback(&line.payload) {
            Ok(callback) => {
                // Failures were already published as session error events.
                if let Err(err) = lifecycle.handle_callback(callback) {
                    debug!(error = %err, "host_callback_rejected");
                }
                DispatchOutcome::Handled
            }
            Err(err) => {
                warn!(error = %err, "host_line_unrecognized");
                DispatchOutcome::Ignored
            }
        },
        LineChannel::Telemetry => DispatchOutcome::Ignored,
        LineChannel::Unknown => {
            if line.payload.trim().is_empty() {
                DispatchOutcome::Ignored
            } else {
                DispatchOutcome::Passthrough(line.payload)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::LineHost;
    use crate::session::{ChannelObserver, SessionEvent, SessionPhase};

    fn line_lifecycle() -> SessionLifecycle {
        SessionLifecycle::new("game-1", Box::new(LineHost::new(Vec::new())))
    }

    #[test]
    fn host_callbacks_drive_the_lifecycle() {
        let mut lifecycle = line_lifecycle();
        let (observer, events) = ChannelObserver::channel();
        lifecycle.subscribe(observer);

        lifecycle.start_session().expect("start request");
        assert_eq!(
            dispatch_host_line(&mut lifecycle, "C session.started s-77\n"),
            DispatchOutcome::Handled
        );
        assert_eq!(
            dispatch_host_line(
                &mut lifecycle,
                r#"C session.retrieved {"gameId":"game-1","gameToken":"tok"}"#
            ),
            DispatchOutcome::Handled
        );

        assert_eq!(lifecycle.phase(), SessionPhase::Active);
        assert_eq!(lifecycle.current_session_id(), Some("s-77"));
        assert!(lifecycle.has_valid_token());
        let names = events
            .try_iter()
            .map(|event| event.name())
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["session_started", "session_retrieved"]);
    }

    #[test]
    fn malformed_callback_payload_is_handled_not_fatal() {
        let mut lifecycle = line_lifecycle();
        let (observer, events) = ChannelObserver::channel();
        lifecycle.subscribe(observer);

        assert_eq!(
            dispatch_host_line(&mut lifecycle, "C session.retrieved not-json"),
            DispatchOutcome::Handled
        );

        let received = events.try_iter().collect::<Vec<_>>();
        assert!(matches!(received.as_slice(), [SessionEvent::Error { .. }]));
        assert!(!lifecycle.has_valid_token());
    }

    #[test]
    fn telemetry_unknown_callbacks_and_blank_lines_are_ignored() {
        let mut lifecycle = line_lifecycle();
        assert_eq!(
            dispatch_host_line(&mut lifecycle, "T host.frame 1"),
            DispatchOutcome::Ignored
        );
        assert_eq!(
            dispatch_host_line(&mut lifecycle, "C volume.adjust 0.4"),
            DispatchOutcome::Ignored
        );
        assert_eq!(
            dispatch_host_line(&mut lifecycle, "  \r\n"),
            DispatchOutcome::Ignored
        );
    }

    #[test]
    fn unprefixed_lines_pass_through() {
        let mut lifecycle = line_lifecycle();
        assert_eq!(
            dispatch_host_line(&mut lifecycle, "score 10 complete\n"),
            DispatchOutcome::Passthrough("score 10 complete".to_string())
        );
    }
}
