use std::io::Read;

use recycle_core::RecycleError;
use serde_json::de::IoRead;
use serde_json::StreamDeserializer;

use crate::types::MoveMessage;

// ─── MoveStream ───────────────────────────────────────────────────────────

/// Progress lines decoded lazily from a container-move response body.
///
/// tsuru writes one JSON object per event, separated by whitespace or
/// nothing at all. Objects carrying an `Error` field become a line starting
/// with `Error:`; objects with neither field are skipped. A decode or
/// transport failure is yielded once as an `Err` and ends the stream.
pub struct MoveStream<R: Read> {
    inner: StreamDeserializer<'static, IoRead<R>, MoveMessage>,
    done: bool,
}

impl<R: Read> MoveStream<R> {
    pub fn new(reader: R) -> Self {
        Self {
            inner: serde_json::Deserializer::from_reader(reader).into_iter(),
            done: false,
        }
    }
}

impl<R: Read> Iterator for MoveStream<R> {
    type Item = recycle_core::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        loop {
            match self.inner.next()? {
                Ok(msg) => {
                    if !msg.error.is_empty() {
                        return Some(Ok(format!("Error: {}", msg.error)));
                    }
                    if msg.message.is_empty() {
                        continue;
                    }
                    return Some(Ok(msg.message));
                }
                Err(e) => {
                    self.done = true;
                    return Some(Err(RecycleError::Backend(format!(
                        "error reading move stream: {e}"
                    ))));
                }
            }
        }
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────
