use std::io::Write;

use tracing::{debug, warn};

use crate::session::{BoundaryError, BoundaryReply, HostBoundary};

use super::wire::HostRequest;

/// Production boundary: every request becomes one control line on `writer`. Replies
/// arrive later as inbound lines handled by [`super::dispatch_host_line`].
#[derive(Debug)]
pub struct LineHost<W: Write> {
    writer: W,
    closed: bool,
}

impl<W: Write> LineHost<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            closed: false,
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn send(&mut self, request: HostRequest<'_>) -> Result<BoundaryReply, BoundaryError> {
        if self.closed {
            return Err(BoundaryError::Disconnected);
        }
        let line = request.to_wire_line();
        let written = self
            .writer
            .write_all(line.as_bytes())
            .and_then(|()| self.writer.write_all(b"\n"))
            .and_then(|()| self.writer.flush());
        if let Err(err) = written {
            warn!(request = request.kind(), error = %err, "host_line_write_failed");
            self.closed = true;
            return Err(BoundaryError::Io(err));
        }
        debug!(request = request.kind(), "host_line_sent");
        Ok(BoundaryReply::Pending)
    }
}

impl<W: Write> HostBoundary for LineHost<W> {
    fn name(&self) -> &'static str {
        "line"
    }

    fn init_hooks(&mut self) -> Result<BoundaryReply, BoundaryError> {
        self.send(HostRequest::Init)
    }

    fn start_session(&mut self, game_id: &str) -> Result<BoundaryReply, BoundaryError> {
        self.send(HostRequest::StartSession { game_id })
    }

    fn report_score(
        &mut self,
        score: i64,
        metadata: &str,
        complete: bool,
    ) -> Result<BoundaryReply, BoundaryError> {
        self.send(HostRequest::ReportScore {
            score,
            metadata,
            complete,
        })
    }

    fn get_session(&mut self, game_id: &str) -> Result<BoundaryReply, BoundaryError> {
        self.send(HostRequest::GetSession { game_id })
    }

    fn set_equipped_item(&mut self) -> Result<BoundaryReply, BoundaryError> {
        self.send(HostRequest::SetEquippedItem)
    }
}
