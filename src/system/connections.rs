//! TCP/UDP connection tables via the IP Helper API
//!
//! Uses GetExtendedTcpTable/GetExtendedUdpTable with owner-PID rows so
//! each endpoint can be attributed to a process. IPv4 only; addresses in
//! the MIB tables are network byte order.

use std::net::{Ipv4Addr, SocketAddrV4};

use windows::Win32::NetworkManagement::IpHelper::{
    GetExtendedTcpTable, GetExtendedUdpTable, SetTcpEntry, MIB_TCPROW_LH, MIB_TCPROW_LH_0,
    TCP_TABLE_OWNER_PID_ALL, UDP_TABLE_OWNER_PID,
};
use windows::Win32::Networking::WinSock::AF_INET;

use crate::core::{ActionError, ActionOutcome, Provider, RefreshError, Verb};
use crate::model::{ConnectionEntry, Protocol, TcpState};
use crate::system::processes::process_name_map;

// MIB_TCP_STATE_DELETE_TCB; writing it through SetTcpEntry closes the
// connection.
const TCP_DELETE_TCB: u32 = 12;

// Row layouts of MIB_TCPTABLE_OWNER_PID / MIB_UDPTABLE_OWNER_PID. The
// windows crate only generates the basic row types, so the owner-PID rows
// are declared here.
#[repr(C)]
struct TcpRowOwnerPid {
    state: u32,
    local_addr: u32,
    local_port: u32,
    remote_addr: u32,
    remote_port: u32,
    owning_pid: u32,
}

#[repr(C)]
struct UdpRowOwnerPid {
    local_addr: u32,
    local_port: u32,
    owning_pid: u32,
}

/// Decodes a network-order address/port pair from a MIB row.
fn endpoint(addr: u32, port: u32) -> SocketAddrV4 {
    SocketAddrV4::new(Ipv4Addr::from(addr.to_ne_bytes()), u16::from_be(port as u16))
}

/// Double-call buffer fill shared by both table queries.
fn table_buffer(
    fill: impl Fn(Option<*mut core::ffi::c_void>, &mut u32) -> u32,
) -> Result<Vec<u8>, RefreshError> {
    let mut size = 0u32;
    let _ = fill(None, &mut size);
    let mut buffer = vec![0u8; size.max(4) as usize];
    let result = fill(Some(buffer.as_mut_ptr() as *mut _), &mut size);
    if result != 0 {
        return Err(RefreshError::Enumerate {
            kind: "connections",
            reason: format!("table query failed with error {result}"),
        });
    }
    Ok(buffer)
}

/// Enumerates IPv4 TCP connections and UDP listeners with owning PIDs.
pub struct ConnectionProvider;

impl Provider<ConnectionEntry> for ConnectionProvider {
    fn snapshot(&mut self) -> Result<Vec<ConnectionEntry>, RefreshError> {
        let names = process_name_map();
        let mut connections = Vec::new();

        let tcp = table_buffer(|buf, size| {
            // SAFETY: `size` is in/out; the buffer either is absent (probe)
            // or has the capacity the probe reported.
            unsafe { GetExtendedTcpTable(buf, size, false, AF_INET.0 as u32, TCP_TABLE_OWNER_PID_ALL, 0) }
        })?;
        // SAFETY: the table starts with a DWORD entry count followed by
        // that many contiguous owner-PID rows.
        unsafe {
            let count = *(tcp.as_ptr() as *const u32);
            let rows = tcp.as_ptr().add(4) as *const TcpRowOwnerPid;
            for i in 0..count as usize {
                let row = &*rows.add(i);
                connections.push(ConnectionEntry {
                    protocol: Protocol::Tcp,
                    local: endpoint(row.local_addr, row.local_port),
                    remote: Some(endpoint(row.remote_addr, row.remote_port)),
                    state: TcpState::from_raw(row.state),
                    pid: row.owning_pid,
                    process_name: names.get(&row.owning_pid).cloned(),
                });
            }
        }

        let udp = table_buffer(|buf, size| {
            // SAFETY: same contract as the TCP query above.
            unsafe { GetExtendedUdpTable(buf, size, false, AF_INET.0 as u32, UDP_TABLE_OWNER_PID, 0) }
        })?;
        // SAFETY: same layout contract as the TCP table.
        unsafe {
            let count = *(udp.as_ptr() as *const u32);
            let rows = udp.as_ptr().add(4) as *const UdpRowOwnerPid;
            for i in 0..count as usize {
                let row = &*rows.add(i);
                connections.push(ConnectionEntry {
                    protocol: Protocol::Udp,
                    local: endpoint(row.local_addr, row.local_port),
                    remote: None,
                    state: None,
                    pid: row.owning_pid,
                    process_name: names.get(&row.owning_pid).cloned(),
                });
            }
        }

        Ok(connections)
    }
}

/// Closes TCP connections by writing DELETE_TCB into the connection row.
pub struct ConnectionExecutor;

impl crate::core::Executor<ConnectionEntry> for ConnectionExecutor {
    fn run(&mut self, verb: Verb, target: &ConnectionEntry) -> Result<ActionOutcome, ActionError> {
        match verb {
            Verb::CloseConnection => {
                let remote = target.remote.ok_or_else(|| ActionError::NotApplicable {
                    action: "Close Connection",
                    target: target.local.to_string(),
                })?;
                let mut row = MIB_TCPROW_LH {
                    Anonymous: MIB_TCPROW_LH_0 {
                        dwState: TCP_DELETE_TCB,
                    },
                    dwLocalAddr: u32::from_ne_bytes(target.local.ip().octets()),
                    dwLocalPort: u32::from(target.local.port().to_be()),
                    dwRemoteAddr: u32::from_ne_bytes(remote.ip().octets()),
                    dwRemotePort: u32::from(remote.port().to_be()),
                };
                // SAFETY: the row mirrors the values read from the table,
                // with the state replaced by DELETE_TCB.
                let result = unsafe { SetTcpEntry(&mut row) };
                match result {
                    0 => Ok(ActionOutcome::Requested(format!(
                        "Close requested for {} -> {}",
                        target.local, remote
                    ))),
                    // ERROR_NOT_FOUND: the row already went away.
                    1168 => Err(ActionError::TargetVanished {
                        id: format!("{} -> {}", target.local, remote),
                    }),
                    // SetTcpEntry reports a non-elevated caller as 317.
                    317 => Err(ActionError::Os {
                        operation: "SetTcpEntry",
                        reason: "access denied (administrator rights required)".into(),
                    }),
                    code => Err(ActionError::Os {
                        operation: "SetTcpEntry",
                        reason: format!("error {code}"),
                    }),
                }
            }
            _ => Err(ActionError::NotApplicable {
                action: "action",
                target: target.local.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_decode_network_byte_order() {
        // 127.0.0.1 in network order, port 631 in the low 16 bits
        let addr = u32::from_ne_bytes([127, 0, 0, 1]);
        let port = u32::from(631u16.to_be());
        let ep = endpoint(addr, port);
        assert_eq!(ep.to_string(), "127.0.0.1:631");
    }
}
