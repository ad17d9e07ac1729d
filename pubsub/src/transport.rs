use crate::{BrokerKind, Result};

/// A message received on one of the subscribed topics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub topic: String,
    pub body: Vec<u8>,
}

/// Uniform capability surface of a publish/subscribe backend.
///
/// Callers hold a `Box<dyn Transport>` and never branch on the backend again
/// once it was selected.
#[async_trait::async_trait]
pub trait Transport: Send {
    /// The backend behind this transport.
    fn kind(&self) -> BrokerKind;

    /// The identifier the broker knows this client by.
    fn client_id(&self) -> &str;

    /// Builds a backend specific topic name out of its path segments.
    ///
    /// # Arguments
    /// * `segments` - The topic path, outermost first.
    fn topic(&self, segments: &[&str]) -> String;

    /// Opens the connection to the broker and introduces this client.
    async fn connect(&mut self) -> Result<()>;

    /// Starts receiving the messages published on `topic`.
    async fn subscribe(&mut self, topic: &str) -> Result<()>;

    /// Publishes `body` on `topic`.
    async fn publish(&mut self, topic: &str, body: &[u8]) -> Result<()>;

    /// Waits for the next message on any subscribed topic.
    async fn next_delivery(&mut self) -> Result<Delivery>;

    /// Says goodbye to the broker and drops the connection.
    ///
    /// Closing an already closed transport is a no-op.
    async fn close(&mut self) -> Result<()>;
}
