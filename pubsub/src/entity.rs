use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

/// The logical role of the process asking for a transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Driver,
    Daemon,
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Driver => f.write_str("driver"),
            EntityKind::Daemon => f.write_str("daemon"),
        }
    }
}

/// Builds the client identifier a broker sees for `entity` running as instance `daemon_no`.
///
/// Co-located instances of the same role are told apart by `daemon_no`.
pub fn client_id(entity: EntityKind, daemon_no: usize) -> String {
    format!("{entity}-{daemon_no}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_ids_disambiguate_instances() {
        assert_eq!(client_id(EntityKind::Driver, 0), "driver-0");
        assert_ne!(
            client_id(EntityKind::Daemon, 1),
            client_id(EntityKind::Daemon, 2)
        );
    }
}
