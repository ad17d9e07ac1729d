use std::{env, str::FromStr};

use serde::Deserialize;

use crate::TransportErr;

const NARADA_BROKER_NAME: &str = "NaradaBrokering";
const ACTIVEMQ_BROKER_NAME: &str = "ActiveMQ";

/// The closed set of publish/subscribe backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BrokerKind {
    NaradaBrokering,
    ActiveMq,
}

impl BrokerKind {
    /// The canonical configuration name of the backend.
    pub fn name(self) -> &'static str {
        match self {
            BrokerKind::NaradaBrokering => NARADA_BROKER_NAME,
            BrokerKind::ActiveMq => ACTIVEMQ_BROKER_NAME,
        }
    }

    /// The endpoint used when the configuration doesn't name one.
    pub fn default_addr(self) -> &'static str {
        match self {
            BrokerKind::NaradaBrokering => "127.0.0.1:5045",
            BrokerKind::ActiveMq => "127.0.0.1:61616",
        }
    }
}

impl FromStr for BrokerKind {
    type Err = TransportErr;

    /// Matches `s` against the known backend names, ignoring ASCII case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case(NARADA_BROKER_NAME) {
            Ok(BrokerKind::NaradaBrokering)
        } else if s.eq_ignore_ascii_case(ACTIVEMQ_BROKER_NAME) {
            Ok(BrokerKind::ActiveMq)
        } else {
            Err(TransportErr::UnsupportedTransport(s.to_string()))
        }
    }
}

/// Configuration of the publish/subscribe layer.
///
/// `broker` is kept as free text so that an unknown name is only rejected at
/// selection time, carrying the offending value.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TransportConfig {
    pub broker: String,
    #[serde(default)]
    pub addr: Option<String>,
}

impl TransportConfig {
    /// Creates a new `TransportConfig`.
    ///
    /// # Arguments
    /// * `broker` - The backend name, matched case-insensitively.
    /// * `addr` - The broker endpoint, `None` for the backend's default.
    pub fn new(broker: impl Into<String>, addr: Option<String>) -> Self {
        Self {
            broker: broker.into(),
            addr,
        }
    }

    /// Reads the configuration from the `BROKER` and `BROKER_ADDR` environment variables.
    ///
    /// `BROKER` defaults to NaradaBrokering.
    pub fn from_env() -> Self {
        let broker = env::var("BROKER").unwrap_or_else(|_| NARADA_BROKER_NAME.to_string());
        let addr = env::var("BROKER_ADDR").ok();
        Self { broker, addr }
    }

    /// Resolves the configured backend.
    pub fn kind(&self) -> Result<BrokerKind, TransportErr> {
        self.broker.parse()
    }

    /// Resolves the endpoint to connect to.
    pub fn addr_or_default(&self, kind: BrokerKind) -> String {
        self.addr
            .clone()
            .unwrap_or_else(|| kind.default_addr().to_string())
    }
}
