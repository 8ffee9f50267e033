use crate::error::{Result as ServerErrorResult, ServerError};
use crate::subscriber::message_envelope::MessageEnvelope;

use ps_core::{Message, ShutdownGuard, SinkEvent, SubscriberId};

use std::panic::Location;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::ws::{CloseFrame, Message as WsMessage, WebSocket, close_code};
use error_location::ErrorLocation;
use futures::stream::SplitSink;
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio::time::{MissedTickBehavior, interval_at, Instant};

/// Close reason sent when the channel is deleted under a subscriber
pub const CHANNEL_DELETED_REASON: &str = "Channel deleted";

/// Why a subscriber connection ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    ClientClosed,
    ChannelDeleted,
    Shutdown,
}

impl CloseReason {
    fn as_str(&self) -> &'static str {
        match self {
            CloseReason::ClientClosed => "client_closed",
            CloseReason::ChannelDeleted => "channel_deleted",
            CloseReason::Shutdown => "shutdown",
        }
    }
}

/// One attached WebSocket subscriber: replays history, then forwards its sink
pub struct SubscriberConnection {
    subscriber_id: SubscriberId,
    channel: String,
    heartbeat: Duration,
}

impl SubscriberConnection {
    pub fn new(subscriber_id: SubscriberId, channel: String, heartbeat: Duration) -> Self {
        Self {
            subscriber_id,
            channel,
            heartbeat,
        }
    }

    /// Drive the connection until the client leaves, the channel goes away or the server stops
    pub async fn handle(
        self,
        socket: WebSocket,
        replay: Vec<Arc<Message>>,
        mut events: mpsc::Receiver<SinkEvent>,
        mut shutdown_guard: ShutdownGuard,
    ) -> ServerErrorResult<CloseReason> {
        log::info!(
            "Subscriber {} connected to channel {} ({} replayed)",
            self.subscriber_id,
            self.channel,
            replay.len()
        );

        let (mut ws_sender, mut ws_receiver) = socket.split();

        for message in &replay {
            self.send_message(&mut ws_sender, message).await?;
        }

        let mut heartbeat = interval_at(Instant::now() + self.heartbeat, self.heartbeat);
        heartbeat.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let reason = loop {
            tokio::select! {
                event = events.recv() => {
                    match event {
                        Some(SinkEvent::Message(message)) => {
                            self.send_message(&mut ws_sender, &message).await?;
                        }
                        Some(SinkEvent::ChannelDeleted) | None => {
                            Self::send_close(&mut ws_sender, close_code::NORMAL, CHANNEL_DELETED_REASON).await;
                            break CloseReason::ChannelDeleted;
                        }
                    }
                }

                incoming = ws_receiver.next() => {
                    match incoming {
                        Some(Ok(WsMessage::Close(_))) | None => break CloseReason::ClientClosed,
                        Some(Ok(_)) => {}
                        Some(Err(e)) => {
                            return Err(ServerError::WebSocket {
                                message: format!("receive failed on channel {}: {}", self.channel, e),
                                location: ErrorLocation::from(Location::caller()),
                            });
                        }
                    }
                }

                _ = heartbeat.tick() => {
                    ws_sender
                        .send(WsMessage::Ping(bytes::Bytes::new()))
                        .await
                        .map_err(|e| self.send_error(e))?;
                }

                _ = shutdown_guard.wait() => {
                    Self::send_close(&mut ws_sender, close_code::AWAY, "Server shutting down").await;
                    break CloseReason::Shutdown;
                }
            }
        };

        metrics::counter!("push_stream.subscribers.closed", "reason" => reason.as_str())
            .increment(1);
        log::info!(
            "Subscriber {} left channel {}: {}",
            self.subscriber_id,
            self.channel,
            reason.as_str()
        );

        Ok(reason)
    }

    async fn send_message(
        &self,
        ws_sender: &mut SplitSink<WebSocket, WsMessage>,
        message: &Message,
    ) -> ServerErrorResult<()> {
        let envelope = MessageEnvelope::new(&self.channel, message);
        ws_sender
            .send(WsMessage::Text(envelope.to_json().into()))
            .await
            .map_err(|e| self.send_error(e))?;

        metrics::counter!("push_stream.subscribers.messages_sent").increment(1);
        Ok(())
    }

    async fn send_close(
        ws_sender: &mut SplitSink<WebSocket, WsMessage>,
        code: u16,
        reason: &'static str,
    ) {
        let frame = CloseFrame {
            code,
            reason: reason.into(),
        };
        // The peer may already be gone
        let _ = ws_sender.send(WsMessage::Close(Some(frame))).await;
    }

    #[track_caller]
    fn send_error(&self, e: axum::Error) -> ServerError {
        ServerError::WebSocket {
            message: format!("send failed on channel {}: {}", self.channel, e),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}
