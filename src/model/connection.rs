//! Network connection records

use std::net::SocketAddrV4;

use serde::Serialize;

use crate::actions;
use crate::core::{Action, ManagedEntity, VisualState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Protocol {
    Tcp,
    Udp,
}

impl Protocol {
    pub fn label(self) -> &'static str {
        match self {
            Protocol::Tcp => "TCP",
            Protocol::Udp => "UDP",
        }
    }
}

/// TCP connection state from the MIB connection table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TcpState {
    Closed,
    Listen,
    SynSent,
    SynReceived,
    Established,
    FinWait1,
    FinWait2,
    CloseWait,
    Closing,
    LastAck,
    TimeWait,
    DeleteTcb,
}

impl TcpState {
    /// Maps a raw MIB_TCP_STATE value; `None` for unrecognized values.
    pub fn from_raw(raw: u32) -> Option<Self> {
        match raw {
            1 => Some(TcpState::Closed),
            2 => Some(TcpState::Listen),
            3 => Some(TcpState::SynSent),
            4 => Some(TcpState::SynReceived),
            5 => Some(TcpState::Established),
            6 => Some(TcpState::FinWait1),
            7 => Some(TcpState::FinWait2),
            8 => Some(TcpState::CloseWait),
            9 => Some(TcpState::Closing),
            10 => Some(TcpState::LastAck),
            11 => Some(TcpState::TimeWait),
            12 => Some(TcpState::DeleteTcb),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TcpState::Closed => "Closed",
            TcpState::Listen => "Listen",
            TcpState::SynSent => "Syn Sent",
            TcpState::SynReceived => "Syn Received",
            TcpState::Established => "Established",
            TcpState::FinWait1 => "Fin Wait 1",
            TcpState::FinWait2 => "Fin Wait 2",
            TcpState::CloseWait => "Close Wait",
            TcpState::Closing => "Closing",
            TcpState::LastAck => "Last Ack",
            TcpState::TimeWait => "Time Wait",
            TcpState::DeleteTcb => "Delete TCB",
        }
    }
}

/// One row from the TCP or UDP connection tables. Identity is the whole
/// endpoint tuple: protocol, local endpoint and remote endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ConnectionEntry {
    pub protocol: Protocol,
    pub local: SocketAddrV4,
    /// `None` for UDP listeners (connectionless)
    pub remote: Option<SocketAddrV4>,
    /// `None` for UDP rows and unrecognized raw states
    pub state: Option<TcpState>,
    /// Owning process
    pub pid: u32,
    /// Name of the owning process, when resolvable
    pub process_name: Option<String>,
}

impl ManagedEntity for ConnectionEntry {
    type Key = String;

    fn key(&self) -> String {
        self.id()
    }

    fn id(&self) -> String {
        match self.remote {
            Some(remote) => format!("{}/{}->{}", self.protocol.label(), self.local, remote),
            None => format!("{}/{}", self.protocol.label(), self.local),
        }
    }

    fn label(&self) -> String {
        let owner = self.process_name.as_deref().unwrap_or("?");
        format!("{} ({})", self.id(), owner)
    }

    fn columns() -> &'static [&'static str] {
        &["Proto", "Local Address", "Remote Address", "State", "PID", "Process"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.protocol.label().to_string(),
            self.local.to_string(),
            self.remote.map(|r| r.to_string()).unwrap_or_else(|| "*".to_string()),
            self.state.map(|s| s.label().to_string()).unwrap_or_default(),
            self.pid.to_string(),
            self.process_name.clone().unwrap_or_default(),
        ]
    }

    fn visual_state(&self) -> VisualState {
        match self.state {
            Some(TcpState::Established) => VisualState::Active,
            Some(TcpState::Listen) | None => VisualState::Neutral,
            Some(TcpState::Closed) => VisualState::Inactive,
            Some(_) => VisualState::Transitional,
        }
    }

    fn eligible_actions(&self) -> Vec<Action> {
        actions::connection::eligible(self)
    }

    fn catalog() -> &'static [Action] {
        &actions::connection::CATALOG
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    #[test]
    fn identity_covers_the_endpoint_tuple() {
        let conn = ConnectionEntry {
            protocol: Protocol::Tcp,
            local: SocketAddrV4::new(Ipv4Addr::new(127, 0, 0, 1), 631),
            remote: Some(SocketAddrV4::new(Ipv4Addr::new(10, 0, 0, 2), 443)),
            state: Some(TcpState::Established),
            pid: 42,
            process_name: None,
        };
        assert_eq!(conn.id(), "TCP/127.0.0.1:631->10.0.0.2:443");
    }

    #[test]
    fn unknown_raw_tcp_state_is_none() {
        assert_eq!(TcpState::from_raw(5), Some(TcpState::Established));
        assert_eq!(TcpState::from_raw(0), None);
        assert_eq!(TcpState::from_raw(55), None);
    }
}
