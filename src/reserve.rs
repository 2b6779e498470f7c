// Reservation of named ports
//
// "Reserve" is loose wording: every port is released again the moment it has
// been probed. A reservation is a best guess that the port is free, not a lock.

use crate::errors::{PortError, Result};
use crate::probe::Prober;
use std::fmt;
use std::str::FromStr;

/// Caller-supplied name a reserved port is published under
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PortName(String);

impl PortName {
    /// Create a name, rejecting empty or whitespace-only input
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(PortError::InvalidPortName(
                "port name cannot be empty".to_string(),
            ));
        }
        Ok(Self(name))
    }

    /// Validate a whole list of names, stopping at the first bad one
    pub fn parse_all<I, S>(names: I) -> Result<Vec<PortName>>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        names.into_iter().map(PortName::new).collect()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PortName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PortName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for PortName {
    type Err = PortError;

    fn from_str(s: &str) -> Result<Self> {
        PortName::new(s)
    }
}

impl TryFrom<String> for PortName {
    type Error = PortError;

    fn try_from(s: String) -> Result<Self> {
        PortName::new(s)
    }
}

impl TryFrom<&str> for PortName {
    type Error = PortError;

    fn try_from(s: &str) -> Result<Self> {
        PortName::new(s)
    }
}

/// Ordered name -> port mapping produced by one `reserve_all` call
///
/// Entries keep the order names were first requested in. Requesting a name
/// twice keeps its first position but takes the later port.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reservation {
    entries: Vec<(PortName, u16)>,
}

impl Reservation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a port, overwriting any earlier port for the same name
    pub fn insert(&mut self, name: PortName, port: u16) -> Option<u16> {
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => Some(std::mem::replace(&mut entry.1, port)),
            None => {
                self.entries.push((name, port));
                None
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<u16> {
        self.entries
            .iter()
            .find(|(n, _)| n.as_str() == name)
            .map(|(_, port)| *port)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PortName, u16)> {
        self.entries.iter().map(|(name, port)| (name, *port))
    }

    pub fn names(&self) -> impl Iterator<Item = &PortName> {
        self.entries.iter().map(|(name, _)| name)
    }

    pub fn ports(&self) -> impl Iterator<Item = u16> + '_ {
        self.entries.iter().map(|(_, port)| *port)
    }

    /// Name -> stringified port pairs, as handed to a property sink
    pub fn to_properties(&self) -> Vec<(String, String)> {
        self.entries
            .iter()
            .map(|(name, port)| (name.to_string(), port.to_string()))
            .collect()
    }
}

/// Probe one port per name, in order
///
/// Probing is sequential. The first failed probe aborts the batch and no
/// partial reservation is returned.
pub fn reserve_all<P>(prober: &P, names: &[PortName]) -> Result<Reservation>
where
    P: Prober + ?Sized,
{
    let mut reservation = Reservation::new();

    if names.is_empty() {
        tracing::debug!("No port names requested, nothing to reserve");
        return Ok(reservation);
    }

    for name in names {
        let port = prober.reserve_one()?;
        tracing::info!(port, name = %name, "Reserved port {} for {}", port, name);

        if let Some(previous) = reservation.insert(name.clone(), port) {
            tracing::debug!(
                name = %name,
                previous,
                "Duplicate port name, replacing port {} with {}",
                previous,
                port
            );
        }
    }

    Ok(reservation)
}
