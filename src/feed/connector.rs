use chrono::Utc;
use futures_util::StreamExt;
use std::sync::Arc;
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::handshake::client::Request;
use tokio_tungstenite::tungstenite::protocol::Message;

use crate::contact::{decode_snapshot, ContactStore};

use super::endpoint::FeedEndpoint;
use super::error::FeedError;
use super::sink::{ErrorSink, LogSink};
use super::state::{ConnectionState, FeedStatus};

const MAX_LOGGED_PAYLOAD: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Stop,
}

struct Pipeline {
    store: ContactStore,
    status: watch::Sender<FeedStatus>,
    sink: Arc<dyn ErrorSink>,
}

impl Pipeline {
    fn state(&self) -> ConnectionState {
        self.status.borrow().state
    }

    fn transition(&self, event: fn(ConnectionState) -> ConnectionState) {
        self.status.send_modify(|status| {
            let next = event(status.state);
            if next != status.state {
                log::info!("feed {}: {} -> {}", status.url, status.state, next);
            }
            status.state = next;
        });
    }

    fn report(&self, error: FeedError) {
        self.status
            .send_modify(|status| status.last_error = Some(error.to_string()));
        self.sink.report(&error);
    }

    fn handle(&self, msg: Message) -> Flow {
        match msg {
            Message::Text(text) => self.accept_payload(text.as_bytes()),
            Message::Binary(data) => self.accept_payload(&data),
            Message::Close(frame) => {
                log::info!("feed closed by server: {:?}", frame);
                self.transition(ConnectionState::on_close);
                return Flow::Stop;
            }
            // pings are answered by tungstenite itself
            _ => {}
        }
        Flow::Continue
    }

    fn accept_payload(&self, payload: &[u8]) {
        if !self.state().accepts_messages() {
            return;
        }
        self.transition(ConnectionState::on_message);
        self.status.send_modify(|status| status.messages_received += 1);

        match decode_snapshot(payload, Utc::now()) {
            Ok(snapshot) => {
                let received_at = snapshot.received_at();
                self.store.replace(snapshot);
                self.status
                    .send_modify(|status| status.last_snapshot_at = Some(received_at));
            }
            Err(e) => {
                self.status.send_modify(|status| status.decode_failures += 1);
                let shown = &payload[..payload.len().min(MAX_LOGGED_PAYLOAD)];
                log::debug!("discarded payload: {}", String::from_utf8_lossy(shown));
                self.report(e.into());
            }
        }
    }
}

#[derive(Debug)]
struct WorkerHandle {
    stop_tx: oneshot::Sender<()>,
    join: JoinHandle<()>,
}

/// One streaming connection to the telemetry feed. There is no reconnection:
/// once closed, the views keep showing the last snapshot.
pub struct FeedConnector {
    endpoint: FeedEndpoint,
    pipeline: Arc<Pipeline>,
    worker: Option<WorkerHandle>,
}

impl FeedConnector {
    pub fn new(endpoint: FeedEndpoint, store: ContactStore) -> Self {
        Self::with_sink(endpoint, store, Arc::new(LogSink))
    }

    pub fn with_sink(endpoint: FeedEndpoint, store: ContactStore, sink: Arc<dyn ErrorSink>) -> Self {
        let (status, _rx) = watch::channel(FeedStatus::new(endpoint.url()));
        Self {
            endpoint,
            pipeline: Arc::new(Pipeline {
                store,
                status,
                sink,
            }),
            worker: None,
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.pipeline.state()
    }

    pub fn status(&self) -> watch::Receiver<FeedStatus> {
        self.pipeline.status.subscribe()
    }

    pub fn activate(&mut self) -> Result<(), FeedError> {
        if let Some(worker) = &self.worker {
            if !worker.join.is_finished() {
                return Err(FeedError::AlreadyActive);
            }
        }

        let request = self.endpoint.request()?;
        let pipeline = self.pipeline.clone();
        let (stop_tx, stop_rx) = oneshot::channel();
        let join = tokio::spawn(run_connection(request, pipeline, stop_rx));

        self.worker = Some(WorkerHandle { stop_tx, join });
        Ok(())
    }

    /// Releases the connection. Safe to call in any state and any number of
    /// times; a close frame is only sent if the connection is open.
    pub async fn deactivate(&mut self) {
        if let Some(worker) = self.worker.take() {
            let _ = worker.stop_tx.send(());
            if let Err(e) = worker.join.await {
                log::warn!("feed task ended abnormally: {}", e);
            }
        }
    }
}

async fn run_connection(
    request: Request,
    pipeline: Arc<Pipeline>,
    mut stop_rx: oneshot::Receiver<()>,
) {
    pipeline.transition(ConnectionState::on_connecting);

    let mut ws = tokio::select! {
        connected = connect_async(request) => match connected {
            Ok((ws, _response)) => ws,
            Err(e) => {
                pipeline.report(e.into());
                pipeline.transition(ConnectionState::on_error);
                return;
            }
        },
        _ = &mut stop_rx => {
            pipeline.transition(ConnectionState::on_close);
            return;
        }
    };
    pipeline.transition(ConnectionState::on_open);

    loop {
        tokio::select! {
            next = ws.next() => match next {
                Some(Ok(msg)) => {
                    if pipeline.handle(msg) == Flow::Stop {
                        // keep reading so tungstenite flushes its close reply
                        tokio::select! {
                            _ = async { while let Some(Ok(_)) = ws.next().await {} } => {}
                            _ = &mut stop_rx => {}
                        }
                        return;
                    }
                }
                Some(Err(e)) => {
                    pipeline.report(e.into());
                    pipeline.transition(ConnectionState::on_error);
                    return;
                }
                None => {
                    log::info!("feed stream ended");
                    pipeline.transition(ConnectionState::on_close);
                    return;
                }
            },
            _ = &mut stop_rx => {
                if pipeline.state() == ConnectionState::Open {
                    if let Err(e) = ws.close(None).await {
                        log::debug!("closing feed connection: {}", e);
                    }
                }
                pipeline.transition(ConnectionState::on_close);
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::SinkExt;
    use std::sync::Mutex;
    use std::time::Duration;
    use tokio::net::TcpListener;
    use tokio::time::timeout;

    const GOOD: &str = r#"{"contacts":[{"icao":"A1B2C3","last_seen":5,
        "lat":48.1,"lon":11.5,"position_status":"KNOWN","aircraft_category":"ROTR"}]}"#;
    const WAIT: Duration = Duration::from_secs(5);

    #[derive(Default)]
    struct RecordingSink(Mutex<Vec<String>>);

    impl ErrorSink for RecordingSink {
        fn report(&self, error: &FeedError) {
            self.0.lock().unwrap().push(error.to_string());
        }
    }

    /// Accepts one websocket client, sends `messages`, then reports whether
    /// the client closed the connection with a close frame.
    async fn feed_server(messages: Vec<String>) -> (u16, oneshot::Receiver<bool>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let (closed_tx, closed_rx) = oneshot::channel();
        tokio::spawn(async move {
            let (tcp, _) = listener.accept().await.unwrap();
            let mut ws = tokio_tungstenite::accept_async(tcp).await.unwrap();
            for m in messages {
                ws.send(Message::text(m)).await.unwrap();
            }
            let mut got_close = false;
            while let Some(Ok(msg)) = ws.next().await {
                if msg.is_close() {
                    got_close = true;
                    break;
                }
            }
            let _ = closed_tx.send(got_close);
        });
        (port, closed_rx)
    }

    fn connector(port: u16, store: &ContactStore) -> (FeedConnector, Arc<RecordingSink>) {
        let sink = Arc::new(RecordingSink::default());
        let endpoint = FeedEndpoint::new("127.0.0.1", port, "/");
        let connector = FeedConnector::with_sink(endpoint, store.clone(), sink.clone());
        (connector, sink)
    }

    #[tokio::test]
    async fn snapshot_replaces_store() {
        let (port, _closed) = feed_server(vec![GOOD.to_string()]).await;
        let store = ContactStore::new();
        let (mut connector, _sink) = connector(port, &store);
        assert!(store.current().is_none());

        let mut rx = store.subscribe();
        connector.activate().unwrap();
        timeout(WAIT, rx.changed()).await.unwrap().unwrap();

        let snapshot = store.current().unwrap();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot.contacts()[0].icao, "A1B2C3");
        assert_eq!(connector.state(), ConnectionState::Open);
        connector.deactivate().await;
    }

    #[tokio::test]
    async fn malformed_message_keeps_last_good_snapshot() {
        let messages = vec![GOOD.to_string(), "{not json".to_string()];
        let (port, _closed) = feed_server(messages).await;
        let store = ContactStore::new();
        let (mut connector, sink) = connector(port, &store);
        let mut status = connector.status();

        connector.activate().unwrap();
        timeout(WAIT, status.wait_for(|s| s.decode_failures == 1))
            .await
            .unwrap()
            .unwrap();

        let snapshot = store.current().unwrap();
        assert_eq!(snapshot.contacts()[0].icao, "A1B2C3");
        assert_eq!(connector.status().borrow().messages_received, 2);
        assert_eq!(connector.state(), ConnectionState::Open);
        assert_eq!(sink.0.lock().unwrap().len(), 1);
        connector.deactivate().await;
    }

    #[tokio::test]
    async fn deactivate_sends_close_and_is_idempotent() {
        let (port, closed) = feed_server(vec![GOOD.to_string()]).await;
        let store = ContactStore::new();
        let (mut connector, _sink) = connector(port, &store);
        let mut status = connector.status();

        connector.activate().unwrap();
        timeout(WAIT, status.wait_for(|s| s.state == ConnectionState::Open))
            .await
            .unwrap()
            .unwrap();

        connector.deactivate().await;
        connector.deactivate().await;
        assert_eq!(connector.state(), ConnectionState::Closed);
        assert!(timeout(WAIT, closed).await.unwrap().unwrap());
    }

    #[tokio::test]
    async fn deactivate_before_activate_is_noop() {
        let store = ContactStore::new();
        let (mut connector, _sink) = connector(9, &store);
        connector.deactivate().await;
        connector.deactivate().await;
        assert_eq!(connector.state(), ConnectionState::Idle);
    }

    #[tokio::test]
    async fn deactivate_while_connecting() {
        // accepts TCP but never answers the websocket handshake
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let store = ContactStore::new();
        let (mut connector, sink) = connector(port, &store);
        let mut status = connector.status();

        connector.activate().unwrap();
        timeout(WAIT, status.wait_for(|s| s.state == ConnectionState::Connecting))
            .await
            .unwrap()
            .unwrap();
        timeout(WAIT, connector.deactivate()).await.unwrap();

        assert_eq!(connector.state(), ConnectionState::Closed);
        assert!(sink.0.lock().unwrap().is_empty());
        drop(listener);
    }

    #[tokio::test]
    async fn refused_connection_is_reported_without_retry() {
        let port = {
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            listener.local_addr().unwrap().port()
        };
        let store = ContactStore::new();
        let (mut connector, sink) = connector(port, &store);
        let mut status = connector.status();

        connector.activate().unwrap();
        timeout(WAIT, status.wait_for(|s| s.state == ConnectionState::Closed))
            .await
            .unwrap()
            .unwrap();

        assert!(status.borrow().last_error.is_some());
        assert_eq!(sink.0.lock().unwrap().len(), 1);
        assert!(store.current().is_none());
        connector.deactivate().await;
    }

    #[tokio::test]
    async fn second_activate_is_rejected_while_running() {
        let (port, _closed) = feed_server(vec![]).await;
        let store = ContactStore::new();
        let (mut connector, _sink) = connector(port, &store);
        connector.activate().unwrap();
        assert!(matches!(connector.activate(), Err(FeedError::AlreadyActive)));
        connector.deactivate().await;
    }

    #[tokio::test]
    async fn server_close_freezes_last_snapshot() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let (acked_tx, acked_rx) = oneshot::channel();
        tokio::spawn(async move {
            let (tcp, _) = listener.accept().await.unwrap();
            let mut ws = tokio_tungstenite::accept_async(tcp).await.unwrap();
            ws.send(Message::text(GOOD.to_string())).await.unwrap();
            ws.close(None).await.unwrap();
            let reply = ws.next().await;
            let _ = acked_tx.send(matches!(reply, Some(Ok(Message::Close(_)))));
        });

        let store = ContactStore::new();
        let (mut connector, _sink) = connector(port, &store);
        let mut status = connector.status();
        connector.activate().unwrap();
        timeout(
            WAIT,
            status.wait_for(|s| s.state == ConnectionState::Closed && s.messages_received == 1),
        )
        .await
        .unwrap()
        .unwrap();

        assert!(store.current().is_some());
        assert!(status.borrow().is_frozen());
        assert!(timeout(WAIT, acked_rx).await.unwrap().unwrap());
        connector.deactivate().await;
    }
}
