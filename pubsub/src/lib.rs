//! Pluggable publish/subscribe transports.
//!
//! A backend is picked once, by name, from a closed set. Everything past
//! [`select_transport`] talks to a `Box<dyn Transport>`.

mod activemq;
mod config;
mod entity;
mod error;
pub mod frame;
mod link;
mod narada;
mod transport;

use log::debug;

pub use activemq::ActiveMqTransport;
pub use config::{BrokerKind, TransportConfig};
pub use entity::{EntityKind, client_id};
pub use error::{Result, TransportErr};
pub use narada::NaradaTransport;
pub use transport::{Delivery, Transport};

/// Chooses the transport backend named by `config`.
///
/// No connection is opened here, the returned transport still has to `connect`.
///
/// # Arguments
/// * `config` - The transport configuration, its broker name is matched case-insensitively.
/// * `entity` - The role requesting the transport.
/// * `daemon_no` - The instance index, used to tell co-located instances apart.
///
/// # Returns
/// The selected transport or `TransportErr::UnsupportedTransport` carrying the
/// offending name.
pub fn select_transport(
    config: &TransportConfig,
    entity: EntityKind,
    daemon_no: usize,
) -> Result<Box<dyn Transport>> {
    let kind = config.kind()?;
    let addr = config.addr_or_default(kind);
    debug!("selected {} transport at {addr} for {entity}-{daemon_no}", kind.name());

    let transport: Box<dyn Transport> = match kind {
        BrokerKind::NaradaBrokering => Box::new(NaradaTransport::new(addr, entity, daemon_no)),
        BrokerKind::ActiveMq => Box::new(ActiveMqTransport::new(addr, entity, daemon_no)),
    };

    Ok(transport)
}
