//! The host read loop
//!
//! Strictly request-response: one frame is read, dispatched, and answered
//! before the next read. The loop ends on end-of-stream (the browser closed
//! our stdin, normal shutdown) or on a framing error, in which case one error
//! response is attempted before giving up.

use std::io::{Read, Write};

use tracing::{error, info};

use crate::error::Result;
use crate::framing::FramedChannel;
use crate::protocol::Response;
use crate::router::Router;
use crate::store::SecretStore;

/// Run the request-response loop until the input stream ends.
pub fn run<R, W, S>(channel: &mut FramedChannel<R, W>, router: &Router<S>) -> Result<()>
where
    R: Read,
    W: Write,
    S: SecretStore,
{
    loop {
        match channel.read_message() {
            Ok(Some(message)) => {
                let response = router.dispatch(message);
                channel.write_response(&response)?;
            }
            Ok(None) => {
                info!("end of stream, shutting down");
                return Ok(());
            }
            Err(e) => {
                error!(error = %e, "failed to read message");
                // Best effort: the stream may already be unusable.
                let _ = channel
                    .write_response(&Response::error(format!("Failed to read message: {e}")));
                return Err(e);
            }
        }
    }
}
