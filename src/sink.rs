// Property sinks: where a finished reservation is published
//
// Sinks only ever see a complete reservation. A failed batch never reaches them.

use crate::errors::{PortError, Result};
use crate::properties::Properties;
use crate::reserve::Reservation;
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

/// Destination for reserved ports
pub trait PropertySink {
    fn accept(&mut self, reservation: &Reservation) -> Result<()>;
}

/// In-memory property set shared by the steps of one build session
#[derive(Debug, Default)]
pub struct PropertyStore {
    properties: Properties,
}

impl PropertyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing set of session properties
    pub fn with_properties(properties: Properties) -> Self {
        Self { properties }
    }

    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    pub fn into_properties(self) -> Properties {
        self.properties
    }
}

impl PropertySink for PropertyStore {
    fn accept(&mut self, reservation: &Reservation) -> Result<()> {
        self.properties.merge(reservation);
        Ok(())
    }
}

/// Writes reserved ports to a properties file
///
/// By default the file is replaced and holds only the reserved names. With
/// `merge` set, existing entries are kept and reserved names overwrite them.
/// The file is exclusively locked while it is read and rewritten, so build
/// executions sharing one file do not interleave their writes.
#[derive(Debug, Clone)]
pub struct PropertiesFileSink {
    path: PathBuf,
    merge: bool,
    comment: Option<String>,
}

impl PropertiesFileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            merge: false,
            comment: None,
        }
    }

    pub fn merge(mut self, merge: bool) -> Self {
        self.merge = merge;
        self
    }

    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write(&self, reservation: &Reservation) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        // Not truncated on open: merge mode has to read the file under the lock first
        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&self.path)?;

        // Released when the file is closed
        file.lock_exclusive()?;

        let mut properties = if self.merge {
            let mut content = String::new();
            file.read_to_string(&mut content)?;
            Properties::parse(&content)
        } else {
            Properties::new()
        };
        properties.merge(reservation);

        file.set_len(0)?;
        file.seek(SeekFrom::Start(0))?;
        {
            let mut writer = BufWriter::new(&mut file);
            properties.write_to(&mut writer, self.comment.as_deref())?;
        }
        file.sync_all()
    }

    /// Read back the properties currently in the file
    pub fn load(&self) -> Result<Properties> {
        let mut file = File::open(&self.path)?;
        file.lock_shared()?;

        let mut content = String::new();
        file.read_to_string(&mut content)?;
        Ok(Properties::parse(&content))
    }
}

impl PropertySink for PropertiesFileSink {
    fn accept(&mut self, reservation: &Reservation) -> Result<()> {
        self.write(reservation)
            .map_err(|e| PortError::sink_write(&self.path, e))?;

        tracing::info!(
            path = %self.path.display(),
            count = reservation.len(),
            "Wrote {} port(s) to {}",
            reservation.len(),
            self.path.display()
        );
        Ok(())
    }
}

/// Rendering used when ports are printed rather than written to a file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// `name=port` lines
    #[default]
    Properties,
    /// A JSON object of name to port
    Json,
    /// `export NAME=port` lines for a POSIX shell
    Env,
}

/// Prints reserved ports to a stream, stdout unless told otherwise
pub struct StreamSink<W: Write> {
    writer: W,
    format: OutputFormat,
}

impl StreamSink<io::Stdout> {
    pub fn stdout(format: OutputFormat) -> Self {
        Self::new(io::stdout(), format)
    }
}

impl<W: Write> StreamSink<W> {
    pub fn new(writer: W, format: OutputFormat) -> Self {
        Self { writer, format }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write(&mut self, reservation: &Reservation) -> io::Result<()> {
        match self.format {
            OutputFormat::Properties => {
                Properties::from(reservation).write_entries(&mut self.writer)?;
            }
            OutputFormat::Json => {
                let map: serde_json::Map<String, serde_json::Value> = reservation
                    .iter()
                    .map(|(name, port)| (name.to_string(), serde_json::Value::from(port)))
                    .collect();
                serde_json::to_writer_pretty(&mut self.writer, &map)?;
                writeln!(self.writer)?;
            }
            OutputFormat::Env => {
                for (name, port) in reservation.iter() {
                    writeln!(self.writer, "export {}={}", env_var_name(name.as_str()), port)?;
                }
            }
        }
        self.writer.flush()
    }
}

impl<W: Write> PropertySink for StreamSink<W> {
    fn accept(&mut self, reservation: &Reservation) -> Result<()> {
        self.write(reservation)
            .map_err(|e| PortError::sink_write("<stdout>", e))
    }
}

/// `http.port` -> `HTTP_PORT`
pub fn env_var_name(name: &str) -> String {
    let mut var: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect();

    if var.starts_with(|c: char| c.is_ascii_digit()) {
        var.insert(0, '_');
    }
    var
}
