//! Websocket connection to the table server.
//!
//! A background task owns the socket. Outgoing events are queued on an
//! unbounded channel so sending never blocks the caller; inbound frames are
//! decoded once and handed over as [`Inbound`] values.

use futures_util::{SinkExt, StreamExt};
use tango_shared::{ClientEvent, ServerEvent};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, error, warn};
use url::Url;

use crate::engine::ActionSink;
use crate::error::{ProtocolError, TransportError};

const INBOUND_CAPACITY: usize = 256;

/// Build a websocket URL from a base string (like "localhost:5000" or
/// "http://host:5000"). A bare host gets the `/ws` path.
pub fn build_ws_url(base: &str) -> Result<Url, TransportError> {
    let base = base.trim();
    let mut url = if base.contains("://") {
        Url::parse(base)?
    } else {
        Url::parse(&format!("http://{}", base))?
    };

    let scheme = match url.scheme() {
        "http" | "ws" => "ws",
        "https" | "wss" => "wss",
        other => return Err(TransportError::UnsupportedScheme(other.to_string())),
    };
    if url.set_scheme(scheme).is_err() {
        return Err(TransportError::UnsupportedScheme(url.scheme().to_string()));
    }
    if url.path().is_empty() || url.path() == "/" {
        url.set_path("/ws");
    }
    Ok(url)
}

/// Cloneable handle for queueing events to the server.
#[derive(Clone, Debug)]
pub struct Outbox {
    tx: mpsc::UnboundedSender<ClientEvent>,
}

impl Outbox {
    pub fn new(tx: mpsc::UnboundedSender<ClientEvent>) -> Self {
        Outbox { tx }
    }
}

impl ActionSink for Outbox {
    fn send(&self, event: ClientEvent) -> Result<(), TransportError> {
        self.tx.send(event).map_err(|_| TransportError::NotConnected)
    }
}

/// Something that arrived from the server.
#[derive(Debug)]
pub enum Inbound {
    Event(ServerEvent),
    /// A text frame that did not decode; the frame is dropped.
    Malformed(ProtocolError),
    /// The connection ended, with a reason when one is known.
    Closed(Option<String>),
}

pub struct Connection {
    url: Url,
    outbox: Outbox,
    inbound: mpsc::Receiver<Inbound>,
    task: Option<JoinHandle<()>>,
}

impl Connection {
    pub async fn connect(base: &str) -> Result<Self, TransportError> {
        let url = build_ws_url(base)?;
        let (ws_stream, _resp) = tokio_tungstenite::connect_async(url.as_str()).await?;
        debug!(url = %url, "websocket connected");

        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let (in_tx, in_rx) = mpsc::channel(INBOUND_CAPACITY);
        let task = tokio::spawn(socket_loop(ws_stream, cmd_rx, in_tx));

        Ok(Connection {
            url,
            outbox: Outbox::new(cmd_tx),
            inbound: in_rx,
            task: Some(task),
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn outbox(&self) -> Outbox {
        self.outbox.clone()
    }

    /// Next inbound item; `None` once the socket task has finished.
    pub async fn recv(&mut self) -> Option<Inbound> {
        self.inbound.recv().await
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

async fn socket_loop<S>(
    ws_stream: tokio_tungstenite::WebSocketStream<S>,
    mut cmd_rx: mpsc::UnboundedReceiver<ClientEvent>,
    in_tx: mpsc::Sender<Inbound>,
) where
    S: tokio::io::AsyncRead + tokio::io::AsyncWrite + Unpin,
{
    let (mut write, mut read) = ws_stream.split();

    loop {
        tokio::select! {
            cmd = cmd_rx.recv() => {
                let Some(event) = cmd else {
                    debug!("outbox dropped, closing websocket");
                    let _ = write.close().await;
                    let _ = in_tx.send(Inbound::Closed(None)).await;
                    break;
                };
                let txt = match encode(&event) {
                    Ok(txt) => txt,
                    Err(e) => {
                        error!(error = %e, "dropping client event");
                        continue;
                    }
                };
                if let Err(e) = write.send(Message::Text(txt)).await {
                    error!(error = %e, "websocket send failed");
                    let _ = in_tx.send(Inbound::Closed(Some(e.to_string()))).await;
                    break;
                }
            }
            frame = read.next() => {
                let item = match frame {
                    Some(Ok(Message::Text(txt))) => decode(&txt),
                    Some(Ok(Message::Close(close))) => {
                        Inbound::Closed(close.map(|c| c.reason.to_string()))
                    }
                    Some(Ok(_other)) => continue,
                    Some(Err(e)) => {
                        error!(error = %e, "websocket receive failed");
                        Inbound::Closed(Some(e.to_string()))
                    }
                    None => Inbound::Closed(None),
                };
                let closing = matches!(item, Inbound::Closed(_));
                if in_tx.send(item).await.is_err() || closing {
                    break;
                }
            }
        }
    }
    debug!("websocket task finished");
}

fn encode(event: &ClientEvent) -> Result<String, TransportError> {
    Ok(serde_json::to_string(event)?)
}

fn decode(txt: &str) -> Inbound {
    match serde_json::from_str::<ServerEvent>(txt) {
        Ok(event) => Inbound::Event(event),
        Err(e) => {
            warn!(error = %e, "undecodable frame from server");
            Inbound::Malformed(ProtocolError::Malformed(e.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_hosts_get_ws_scheme_and_path() {
        assert_eq!(
            build_ws_url("localhost:5000").unwrap().as_str(),
            "ws://localhost:5000/ws"
        );
        assert_eq!(
            build_ws_url("https://tango.example").unwrap().as_str(),
            "wss://tango.example/ws"
        );
        assert_eq!(
            build_ws_url("ws://127.0.0.1:9/socket").unwrap().as_str(),
            "ws://127.0.0.1:9/socket"
        );
        assert!(build_ws_url("ftp://example.com").is_err());
    }

    #[test]
    fn closed_outbox_reports_not_connected() {
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);
        let outbox = Outbox::new(tx);
        let err = outbox
            .send(ClientEvent::JoinTable {
                session_id: "s".into(),
            })
            .unwrap_err();
        assert!(matches!(err, TransportError::NotConnected));
    }

    #[test]
    fn outgoing_events_encode_as_type_and_data() {
        let txt = encode(&ClientEvent::JoinTable {
            session_id: "s".into(),
        })
        .unwrap();
        assert_eq!(txt, r#"{"type":"join_table","data":{"session_id":"s"}}"#);
    }

    #[test]
    fn bad_frames_decode_as_malformed() {
        assert!(matches!(
            decode("{\"type\":\"nope\"}"),
            Inbound::Malformed(ProtocolError::Malformed(_))
        ));
        assert!(matches!(
            decode(r#"{"type":"error","data":{"message":"Table is full"}}"#),
            Inbound::Event(ServerEvent::Error { .. })
        ));
    }
}
