// Port probing: ask the OS for a free port and give it straight back
//
// Nothing is held after a probe returns. The port is free at the instant of
// return only; another process may claim it before the caller binds it.

use crate::errors::{PortError, Result};
use std::net::{IpAddr, Ipv4Addr, SocketAddr, TcpListener};

/// Source of currently-unused port numbers
pub trait Prober: Send + Sync {
    /// Probe for a single free port
    fn reserve_one(&self) -> Result<u16>;
}

/// Prober backed by the kernel's ephemeral port allocator
#[derive(Debug, Clone, Copy)]
pub struct SystemProber {
    bind_address: IpAddr,
}

impl SystemProber {
    /// Probe on the wildcard address
    pub fn new() -> Self {
        Self {
            bind_address: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
        }
    }

    /// Probe on a specific local address, e.g. `127.0.0.1` or `::`
    pub fn with_bind_address(bind_address: IpAddr) -> Self {
        Self { bind_address }
    }

    pub fn bind_address(&self) -> IpAddr {
        self.bind_address
    }
}

impl Default for SystemProber {
    fn default() -> Self {
        Self::new()
    }
}

impl Prober for SystemProber {
    fn reserve_one(&self) -> Result<u16> {
        let listener = TcpListener::bind(SocketAddr::new(self.bind_address, 0))
            .map_err(PortError::PortProbe)?;
        let port = listener.local_addr().map_err(PortError::PortProbe)?.port();

        // Close before returning so the port goes back to the free pool
        drop(listener);

        Ok(port)
    }
}

#[cfg(test)]
pub mod test_support {
    use super::*;
    use std::io;
    use std::sync::Mutex;

    /// Prober that hands out a fixed sequence of ports and can be told to fail
    pub struct ScriptedProber {
        ports: Vec<u16>,
        fail_on_call: Option<usize>,
        calls: Mutex<usize>,
    }

    impl ScriptedProber {
        pub fn new(ports: Vec<u16>) -> Self {
            Self {
                ports,
                fail_on_call: None,
                calls: Mutex::new(0),
            }
        }

        /// Fail the given call (1-based) with a probe error
        pub fn failing_on(mut self, call: usize) -> Self {
            self.fail_on_call = Some(call);
            self
        }

        pub fn calls(&self) -> usize {
            *self.calls.lock().unwrap()
        }
    }

    impl Prober for ScriptedProber {
        fn reserve_one(&self) -> Result<u16> {
            let mut calls = self.calls.lock().unwrap();
            *calls += 1;

            if self.fail_on_call == Some(*calls) {
                return Err(PortError::PortProbe(io::Error::new(
                    io::ErrorKind::AddrNotAvailable,
                    "no ports left",
                )));
            }

            self.ports.get(*calls - 1).copied().ok_or_else(|| {
                PortError::PortProbe(io::Error::new(
                    io::ErrorKind::Other,
                    "script exhausted",
                ))
            })
        }
    }
}
