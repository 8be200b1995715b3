// Byte-stream relay for streamed completions

use crate::error::{ProxyError, Result};
use crate::metrics;
use bytes::Bytes;
use futures::stream::{Stream, StreamExt};
use tracing::{debug, warn};

/// Forward upstream chunks to the caller as they arrive.
///
/// Chunks are neither merged, split nor parsed; empty chunks are skipped. An
/// upstream error is yielded once and ends the stream, which aborts the
/// caller's response since bytes may already have been sent. Dropping the
/// returned stream drops `chunks` and with it the upstream connection.
pub fn relay_chunks<S, E>(chunks: S) -> impl Stream<Item = Result<Bytes>> + Send + 'static
where
    S: Stream<Item = std::result::Result<Bytes, E>> + Send + 'static,
    E: Into<ProxyError> + Send + 'static,
{
    async_stream::stream! {
        metrics::record_stream_connection("opened");
        futures::pin_mut!(chunks);

        let mut chunk_count = 0usize;
        let mut failed = false;

        while let Some(chunk_result) = chunks.next().await {
            match chunk_result {
                Ok(chunk) if chunk.is_empty() => continue,
                Ok(chunk) => {
                    chunk_count += 1;
                    metrics::record_stream_chunk(chunk.len());
                    yield Ok(chunk);
                }
                Err(e) => {
                    let error: ProxyError = e.into();
                    warn!("Upstream stream failed after {} chunk(s): {}", chunk_count, error);
                    metrics::record_stream_connection("error");
                    failed = true;
                    yield Err(error);
                    break;
                }
            }
        }

        if !failed {
            metrics::record_stream_connection("completed");
            debug!("Relayed stream ended after {} chunk(s)", chunk_count);
        }
    }
}
