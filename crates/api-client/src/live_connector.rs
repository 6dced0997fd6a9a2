// In crates/api-client/src/live_connector.rs

use crate::Result;
use crate::types::{TickerUpdate, WsTickerEvent};
use async_stream::stream;
use core_types::Symbol;
use futures::Stream;
use futures_util::StreamExt;
use tokio_tungstenite::connect_async;

const RECONNECT_DELAY: std::time::Duration = std::time::Duration::from_secs(5);

/// A connector for receiving live price streams from Binance.
#[derive(Debug, Clone)]
pub struct LiveConnector {
    ws_base_url: String,
}

impl LiveConnector {
    pub fn new(ws_base_url: impl Into<String>) -> Self {
        Self {
            ws_base_url: ws_base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Subscribes to the 24hr ticker of `symbol` and returns an asynchronous
    /// stream of last-price updates.
    ///
    /// Dropped connections are re-established after a short delay, so the
    /// stream only ends when the consumer drops it.
    pub fn stream_live_prices(&self, symbol: &Symbol) -> impl Stream<Item = Result<TickerUpdate>> + use<> {
        let url = format!("{}/{}@ticker", self.ws_base_url, symbol.0.to_lowercase());

        stream! {
            loop {
                tracing::info!(url = %url, "Connecting to WebSocket stream...");
                let (ws_stream, _) = match connect_async(url.as_str()).await {
                    Ok(s) => s,
                    Err(e) => {
                        tracing::error!(error = %e, "WebSocket connection failed. Retrying in 5s...");
                        tokio::time::sleep(RECONNECT_DELAY).await;
                        continue;
                    }
                };
                tracing::info!("WebSocket connection successful.");

                let mut read = ws_stream.fuse();

                while let Some(message) = read.next().await {
                    match message {
                        Ok(msg) => {
                            if let Ok(text) = msg.to_text() {
                                if let Some(update) = parse_ticker(text) {
                                    yield Ok(update);
                                }
                            }
                        }
                        Err(e) => {
                            tracing::warn!(error = %e, "Error reading from WebSocket. Reconnecting...");
                            // Break the inner loop to trigger a reconnection.
                            break;
                        }
                    }
                }
                tokio::time::sleep(RECONNECT_DELAY).await;
            }
        }
    }
}

/// Parses a raw ticker message. Pings, subscription acks and other payloads yield `None`.
pub fn parse_ticker(text: &str) -> Option<TickerUpdate> {
    serde_json::from_str::<WsTickerEvent>(text)
        .ok()
        .filter(|event| event.event_type == "24hrTicker")
        .map(TickerUpdate::from)
}
