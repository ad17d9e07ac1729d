use crate::{BrokerKind, Delivery, EntityKind, Result, Transport, entity, link::BrokerLink};

const TOPIC_SCHEME: &str = "topic://";

/// ActiveMQ backend.
///
/// Topics are dot separated destinations under the `topic://` scheme.
pub struct ActiveMqTransport {
    link: BrokerLink,
}

impl ActiveMqTransport {
    /// Creates a new `ActiveMqTransport`, nothing is opened until `connect`.
    ///
    /// # Arguments
    /// * `addr` - The broker endpoint.
    /// * `entity` - The role requesting the transport.
    /// * `daemon_no` - The instance index of that role.
    pub fn new(addr: String, entity: EntityKind, daemon_no: usize) -> Self {
        let client_id = format!("activemq:{}", entity::client_id(entity, daemon_no));
        Self {
            link: BrokerLink::new(addr, client_id),
        }
    }
}

#[async_trait::async_trait]
impl Transport for ActiveMqTransport {
    fn kind(&self) -> BrokerKind {
        BrokerKind::ActiveMq
    }

    fn client_id(&self) -> &str {
        self.link.client_id()
    }

    fn topic(&self, segments: &[&str]) -> String {
        // Destination names can't carry the separator inside a segment.
        let segments: Vec<_> = segments.iter().map(|s| s.replace('.', "_")).collect();
        format!("{TOPIC_SCHEME}{}", segments.join("."))
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
