//! Frames exchanged between a transport and its broker.

use comms::{ByteReader, Deserialize, PayloadErr, Serialize};

const HELLO_H: u32 = 0;
const SUBSCRIBE_H: u32 = 1;
const PUBLISH_H: u32 = 2;
const DELIVER_H: u32 = 3;
const BYE_H: u32 = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrokerFrame {
    /// First frame of every connection, identifies the client.
    Hello { client_id: String },
    Subscribe { topic: String },
    /// Client to broker.
    Publish { topic: String, body: Vec<u8> },
    /// Broker to client, a message published on a subscribed topic.
    Deliver { topic: String, body: Vec<u8> },
    Bye,
}

fn write_str(buf: &mut Vec<u8>, s: &str) {
    buf.extend_from_slice(&(s.len() as u32).to_be_bytes());
    buf.extend_from_slice(s.as_bytes());
}

impl<'a> Serialize<'a> for BrokerFrame {
    fn serialize(&'a self, buf: &mut Vec<u8>) -> Option<&'a [u8]> {
        match self {
            BrokerFrame::Hello { client_id } => {
                buf.extend_from_slice(&HELLO_H.to_be_bytes());
                write_str(buf, client_id);
                None
            }
            BrokerFrame::Subscribe { topic } => {
                buf.extend_from_slice(&SUBSCRIBE_H.to_be_bytes());
                write_str(buf, topic);
                None
            }
            BrokerFrame::Publish { topic, body } => {
                buf.extend_from_slice(&PUBLISH_H.to_be_bytes());
                write_str(buf, topic);
                Some(body)
            }
            BrokerFrame::Deliver { topic, body } => {
                buf.extend_from_slice(&DELIVER_H.to_be_bytes());
                write_str(buf, topic);
                Some(body)
            }
            BrokerFrame::Bye => {
                buf.extend_from_slice(&BYE_H.to_be_bytes());
                None
            }
        }
    }
}

impl Deserialize for BrokerFrame {
    fn deserialize(buf: &[u8]) -> comms::Result<Self> {
        let mut reader = ByteReader::new(buf);

        let frame = match reader.read_u32("broker frame kind")? {
            HELLO_H => BrokerFrame::Hello {
                client_id: reader.read_str("client id")?.to_string(),
            },
            SUBSCRIBE_H => BrokerFrame::Subscribe {
                topic: reader.read_str("topic")?.to_string(),
            },
            PUBLISH_H => BrokerFrame::Publish {
                topic: reader.read_str("topic")?.to_string(),
                body: reader.read_rest().to_vec(),
            },
            DELIVER_H => BrokerFrame::Deliver {
                topic: reader.read_str("topic")?.to_string(),
                body: reader.read_rest().to_vec(),
            },
            BYE_H => BrokerFrame::Bye,
            tag => {
                return Err(PayloadErr::UnknownTag {
                    field: "broker frame kind",
                    tag,
                });
            }
        };

        reader.finish()?;
        Ok(frame)
    }
}
