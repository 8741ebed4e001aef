//! Agent log stream and the bounded history window it feeds

use std::collections::VecDeque;
use std::io;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, trace};

/// FIFO of the most recent log lines
#[derive(Debug, Clone)]
pub struct LogBuffer {
    lines: VecDeque<String>,
    limit: usize,
}

impl LogBuffer {
    pub fn new(limit: usize) -> Self {
        Self {
            lines: VecDeque::with_capacity(limit),
            limit,
        }
    }

    /// Append a whole batch, then evict the oldest lines over the limit
    pub fn extend<I>(&mut self, batch: I)
    where
        I: IntoIterator<Item = String>,
    {
        self.lines.extend(batch);
        let overflow = self.lines.len().saturating_sub(self.limit);
        if overflow > 0 {
            self.lines.drain(..overflow);
            trace!(evicted = overflow, "Trimmed log history");
        }
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }
}

/// One received line: either a JSON array of messages (how the agent flushes
/// its queue) or a single plain-text message
pub fn decode_batch(raw: &str) -> Vec<String> {
    let raw = raw.trim_end_matches(['\r', '\n']);
    if raw.trim_start().starts_with('[') {
        if let Ok(batch) = serde_json::from_str::<Vec<String>>(raw) {
            return batch;
        }
    }
    if raw.is_empty() { Vec::new() } else { vec![raw.to_string()] }
}

/// Read until EOF, feeding every batch into `buffer`. Returns the number of
/// messages received.
pub async fn follow<R, F>(reader: R, buffer: &mut LogBuffer, mut on_batch: F) -> io::Result<usize>
where
    R: AsyncBufRead + Unpin,
    F: FnMut(&[String]),
{
    let mut lines = reader.lines();
    let mut received = 0;
    while let Some(line) = lines.next_line().await? {
        let batch = decode_batch(&line);
        if batch.is_empty() {
            continue;
        }
        received += batch.len();
        on_batch(&batch);
        buffer.extend(batch);
    }
    debug!(received, kept = buffer.len(), "Log stream closed");
    Ok(received)
}
