use crate::{BrokerKind, Delivery, EntityKind, Result, Transport, entity, link::BrokerLink};

/// NaradaBrokering backend.
///
/// Topics are slash separated paths rooted at `/`.
pub struct NaradaTransport {
    link: BrokerLink,
}

impl NaradaTransport {
    /// Creates a new `NaradaTransport`, nothing is opened until `connect`.
    ///
    /// # Arguments
    /// * `addr` - The broker endpoint.
    /// * `entity` - The role requesting the transport.
    /// * `daemon_no` - The instance index of that role.
    pub fn new(addr: String, entity: EntityKind, daemon_no: usize) -> Self {
        let client_id = format!("narada/{}", entity::client_id(entity, daemon_no));
        Self {
            link: BrokerLink::new(addr, client_id),
        }
    }
}

#[async_trait::async_trait]
impl Transport for NaradaTransport {
    fn kind(&self) -> BrokerKind {
        BrokerKind::NaradaBrokering
    }

    fn client_id(&self) -> &str {
        self.link.client_id()
    }

    fn topic(&self, segments: &[&str]) -> String {
        format!("/{}", segments.join("/"))
    }

    async fn connect(&mut self) -> Result<()> {
        self.link.connect().await
    }

    async fn subscribe(&mut self, topic: &str) -> Result<()> {
        self.link.subscribe(topic).await
    }

    async fn publish(&mut self, topic: &str, body: &[u8]) -> Result<()> {
        self.link.publish(topic, body).await
    }

    async fn next_delivery(&mut self) -> Result<Delivery> {
        self.link.next_delivery().await
    }

    async fn close(&mut self) -> Result<()> {
        self.link.close().await
    }
}
