//! Per-viewer stream session: bridges hub messages onto one open SSE body.

use std::convert::Infallible;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use bytes::Bytes;
use futures::Stream;
use tokio::sync::mpsc;

use crate::hub::{Hub, SubscriptionHandle};

/// One open viewer connection, subscribed for its whole lifetime.
///
/// The stream is handed to hyper as the response body; when the client
/// disconnects (or the response is torn down for any other reason) the body
/// is dropped and `Drop` deregisters the subscription. Cleanup is tied to
/// ownership, so no exit path can leak a registry entry.
pub struct EventStream {
    hub: Arc<Hub>,
    handle: SubscriptionHandle,
    rx: mpsc::UnboundedReceiver<String>,
}

impl EventStream {
    /// Open a session: subscribe to the hub and keep the handle for teardown.
    pub fn new(hub: Arc<Hub>) -> Self {
        let (rx, handle) = hub.subscribe();
        Self { hub, handle, rx }
    }
}

/// Frame one message for the wire. Messages are assumed to contain no
/// embedded newlines; a literal newline would break SSE framing.
fn frame(message: &str) -> Bytes {
    Bytes::from(format!("data: {message}\n\n"))
}

impl Stream for EventStream {
    type Item = Result<Bytes, Infallible>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        match self.rx.poll_recv(cx) {
            Poll::Ready(Some(message)) => Poll::Ready(Some(Ok(frame(&message)))),
            Poll::Ready(None) => Poll::Ready(None),
            Poll::Pending => Poll::Pending,
        }
    }
}

impl Drop for EventStream {
    fn drop(&mut self) {
        self.hub.unsubscribe(self.handle);
    }
}
