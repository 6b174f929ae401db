//! Connection eligibility
//!
//! Eligibility depends on protocol and TCP state jointly: only an
//! established TCP connection can be closed. UDP is connectionless and the
//! remaining TCP states are transient, not independently closable.

use crate::core::{Action, Verb};
use crate::model::{ConnectionEntry, Protocol, TcpState};

pub const CLOSE: Action = Action::new(
    Verb::CloseConnection,
    "Close Connection",
    "Forcibly close the TCP connection",
);

pub const CATALOG: [Action; 1] = [CLOSE];

pub fn eligible(conn: &ConnectionEntry) -> Vec<Action> {
    if conn.protocol == Protocol::Tcp && conn.state == Some(TcpState::Established) {
        vec![CLOSE]
    } else {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{Ipv4Addr, SocketAddrV4};

    fn conn(protocol: Protocol, state: Option<TcpState>) -> ConnectionEntry {
        ConnectionEntry {
            protocol,
            local: SocketAddrV4::new(Ipv4Addr::LOCALHOST, 5000),
            remote: Some(SocketAddrV4::new(Ipv4Addr::new(10, 0, 0, 1), 443)),
            state,
            pid: 100,
            process_name: None,
        }
    }

    #[test]
    fn close_only_for_established_tcp() {
        assert_eq!(
            eligible(&conn(Protocol::Tcp, Some(TcpState::Established))),
            vec![CLOSE]
        );
        assert!(eligible(&conn(Protocol::Udp, None)).is_empty());
        for state in [
            TcpState::Listen,
            TcpState::SynSent,
            TcpState::TimeWait,
            TcpState::CloseWait,
            TcpState::Closed,
        ] {
            assert!(
                eligible(&conn(Protocol::Tcp, Some(state))).is_empty(),
                "{:?}",
                state
            );
        }
    }

    #[test]
    fn udp_never_offers_close_even_with_a_state() {
        // A UDP row never carries a TCP state in practice; the joint
        // condition still guards against it.
        assert!(eligible(&conn(Protocol::Udp, Some(TcpState::Established))).is_empty());
    }
}
