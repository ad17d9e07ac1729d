use comms::{FrameReceiver, FrameSender};
use log::{debug, info};
use tokio::net::{
    TcpStream,
    tcp::{OwnedReadHalf, OwnedWriteHalf},
};

use crate::{Delivery, Result, TransportErr, frame::BrokerFrame};

type NetRx = FrameReceiver<OwnedReadHalf>;
type NetTx = FrameSender<OwnedWriteHalf>;

/// A framed TCP connection to a broker, shared by every backend.
pub(crate) struct BrokerLink {
    addr: String,
    client_id: String,
    channel: Option<(NetRx, NetTx)>,
}

impl BrokerLink {
    /// Creates a new, not yet connected, `BrokerLink`.
    ///
    /// # Arguments
    /// * `addr` - The broker endpoint.
    /// * `client_id` - The identifier announced in the hello frame.
    pub fn new(addr: String, client_id: String) -> Self {
        Self {
            addr,
            client_id,
            channel: None,
        }
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub async fn connect(&mut self) -> Result<()> {
        if self.channel.is_some() {
            return Ok(());
        }

        let stream = TcpStream::connect(&self.addr).await?;
        stream.set_nodelay(true)?;
        let (rx, tx) = stream.into_split();
        let (rx, mut tx) = comms::channel(rx, tx);

        let hello = BrokerFrame::Hello {
            client_id: self.client_id.clone(),
        };
        tx.send(&hello).await?;

        info!(client_id = self.client_id.as_str(), addr = self.addr.as_str(); "connected to broker");
        self.channel = Some((rx, tx));
        Ok(())
    }

    pub async fn subscribe(&mut self, topic: &str) -> Result<()> {
        let (_, tx) = self.channel.as_mut().ok_or(TransportErr::NotConnected)?;

        let frame = BrokerFrame::Subscribe {
            topic: topic.to_string(),
        };
        tx.send(&frame).await?;

        debug!(client_id = self.client_id.as_str(), topic = topic; "subscribed");
        Ok(())
    }

    pub async fn publish(&mut self, topic: &str, body: &[u8]) -> Result<()> {
        let (_, tx) = self.channel.as_mut().ok_or(TransportErr::NotConnected)?;

        let frame = BrokerFrame::Publish {
            topic: topic.to_string(),
            body: body.to_vec(),
        };
        tx.send(&frame).await?;
        Ok(())
    }

    pub async fn next_delivery(&mut self) -> Result<Delivery> {
        let (rx, _) = self.channel.as_mut().ok_or(TransportErr::NotConnected)?;

        match rx.recv().await? {
            BrokerFrame::Deliver { topic, body } => Ok(Delivery { topic, body }),
            BrokerFrame::Bye => {
                self.channel = None;
                Err(TransportErr::Protocol("broker closed the session".into()))
            }
            other => Err(TransportErr::Protocol(format!(
                "expected a delivery, got {other:?}"
            ))),
        }
    }

    pub async fn close(&mut self) -> Result<()> {
        let Some((_, mut tx)) = self.channel.take() else {
            return Ok(());
        };

        tx.send(&BrokerFrame::Bye).await?;
        tx.shutdown().await?;

        info!(client_id = self.client_id.as_str(); "disconnected from broker");
        Ok(())
    }
}
