//! Discovery datagram format.
//!
//! Probe: `mounty_discover`
//! Reply: `mounty_here:<display name>`

/// Payload multicast by a client asking who is listening.
pub const PROBE: &[u8] = b"mounty_discover";

/// Leading marker of every reply.
pub const REPLY_MARKER: &str = "mounty_here";

const DELIMITER: char = ':';

/// A decoded discovery datagram.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiscoveryMessage {
    /// `mounty_discover`, byte for byte.
    Probe,
    /// A responder announcing itself. `name` is `None` when the reply carried
    /// no usable name (older responders send the bare marker).
    Reply { name: Option<String> },
    /// Anything else. Never an error: unrelated traffic on the port is normal.
    Unrecognized,
}

impl DiscoveryMessage {
    pub fn parse(payload: &[u8]) -> Self {
        if payload == PROBE {
            return Self::Probe;
        }

        let text = String::from_utf8_lossy(payload);
        let Some(rest) = text.strip_prefix(REPLY_MARKER) else {
            return Self::Unrecognized;
        };

        if rest.is_empty() {
            return Self::Reply { name: None };
        }

        match rest.strip_prefix(DELIMITER) {
            Some(name) => {
                let name = name.trim();
                Self::Reply {
                    name: (!name.is_empty()).then(|| name.to_string()),
                }
            }
            // "mounty_herefoo" is not ours
            None => Self::Unrecognized,
        }
    }
}

pub fn encode_reply(display_name: &str) -> Vec<u8> {
    format!("{REPLY_MARKER}{DELIMITER}{display_name}").into_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probe_must_match_exactly() {
        assert_eq!(DiscoveryMessage::parse(b"mounty_discover"), DiscoveryMessage::Probe);
        assert_eq!(
            DiscoveryMessage::parse(b"mounty_discover\n"),
            DiscoveryMessage::Unrecognized
        );
        assert_eq!(DiscoveryMessage::parse(b"MOUNTY_DISCOVER"), DiscoveryMessage::Unrecognized);
    }

    #[test]
    fn reply_carries_name() {
        assert_eq!(
            DiscoveryMessage::parse(b"mounty_here:kitchen-laptop"),
            DiscoveryMessage::Reply {
                name: Some("kitchen-laptop".into())
            }
        );
    }

    #[test]
    fn name_may_contain_delimiter() {
        assert_eq!(
            DiscoveryMessage::parse(b"mounty_here:host:with:colons"),
            DiscoveryMessage::Reply {
                name: Some("host:with:colons".into())
            }
        );
    }

    #[test]
    fn bare_or_blank_reply_is_unnamed_peer() {
        assert_eq!(
            DiscoveryMessage::parse(b"mounty_here"),
            DiscoveryMessage::Reply { name: None }
        );
        assert_eq!(
            DiscoveryMessage::parse(b"mounty_here:   "),
            DiscoveryMessage::Reply { name: None }
        );
    }

    #[test]
    fn garbage_is_unrecognized() {
        for payload in [&b""[..], b"hello", b"mounty_herex", &[0xff, 0xfe, 0x00]] {
            assert_eq!(DiscoveryMessage::parse(payload), DiscoveryMessage::Unrecognized);
        }
    }

    #[test]
    fn invalid_utf8_in_name_is_replaced() {
        let mut payload = b"mounty_here:caf".to_vec();
        payload.push(0xe9);
        match DiscoveryMessage::parse(&payload) {
            DiscoveryMessage::Reply { name: Some(name) } => assert!(name.starts_with("caf")),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn encode_reply_matches_wire_format() {
        assert_eq!(encode_reply("den"), b"mounty_here:den".to_vec());
        assert_eq!(
            DiscoveryMessage::parse(&encode_reply("den")),
            DiscoveryMessage::Reply {
                name: Some("den".into())
            }
        );
    }
}
