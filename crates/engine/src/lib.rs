// In crates/engine/src/lib.rs

pub mod live;
pub mod paper;

pub use live::LiveSession;
pub use paper::PaperSession;

use api_client::TickerUpdate;
use futures::{Stream, StreamExt};

/// Pulls the next usable price update, skipping stream errors. Returns `None`
/// when the stream ends or Ctrl-C is received.
pub(crate) async fn next_update<S>(prices: &mut S) -> Option<TickerUpdate>
where
    S: Stream<Item = api_client::Result<TickerUpdate>> + Unpin,
{
    loop {
        let next = tokio::select! {
            biased;
            _ = tokio::signal::ctrl_c() => {
                tracing::warn!("Interrupt received. Stopping session.");
                return None;
            }
            next = prices.next() => next,
        };
        match next? {
            Ok(update) => return Some(update),
            Err(e) => tracing::warn!(error = %e, "Price stream error. Waiting for the next update."),
        }
    }
}
