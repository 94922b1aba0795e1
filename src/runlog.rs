//! Leveled Run Log
//!
//! The run log is the per-invocation record an operator reads after a scheduled run.
//! It is separate from `tracing` diagnostics: lines have a fixed shape so they can be
//! grepped or shipped as-is.
//!
//! ```text
//! 10/18 06:00:02 -- intf: FOC2145X0AB GigabitEthernet1/0/1 10/100/1000BaseTX up
//! 10/18 06:00:02 [es.index] 1 creation. return code: created
//! ```
//!
//! A message at level `L` is written only when `L` is strictly greater than the
//! configured threshold. Writes go straight to the destination without buffering.
//!
//! # Failure
//!
//! Opening the destination returns [`CollectorError::LogOpen`], a failed write returns
//! [`CollectorError::LogWrite`]. Callers treat both as fatal; the binary terminates with
//! a distinct exit status.

use crate::error::{CollectorError, Result};
use std::fmt::Display;
use std::fs::OpenOptions;
use std::io::Write;

/// `strftime` layout of the leading timestamp (local time).
pub const TIMESTAMP_FORMAT: &str = "%m/%d %H:%M:%S";

const STDOUT_NAME: &str = "<stdout>";

/// Writes `level`-gated lines to a file or standard output.
pub struct RunLog {
    threshold: u8,
    path: Option<String>,
    sink: Box<dyn Write + Send>,
}

impl RunLog {
    /// Run log on standard output.
    pub fn stdout(threshold: u8) -> Self {
        Self {
            threshold,
            path: None,
            sink: Box::new(std::io::stdout()),
        }
    }

    /// Opens `path` in append mode, creating it if needed. `None` logs to standard output.
    pub fn open(threshold: u8, path: Option<&str>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::stdout(threshold));
        };

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|source| CollectorError::LogOpen {
                path: path.to_string(),
                source,
            })?;

        Ok(Self {
            threshold,
            path: Some(path.to_string()),
            sink: Box::new(file),
        })
    }

    /// Current threshold
    pub fn level(&self) -> u8 {
        self.threshold
    }

    pub fn set_level(&mut self, threshold: u8) {
        self.threshold = threshold;
    }

    /// Destination name as shown in diagnostics.
    pub fn destination(&self) -> &str {
        self.path.as_deref().unwrap_or(STDOUT_NAME)
    }

    pub fn enabled(&self, level: u8) -> bool {
        level > self.threshold
    }

    /// Writes one line made of the timestamp followed by each fragment, space separated.
    ///
    /// Returns `Ok(false)` when the level is suppressed, `Ok(true)` when the line was written.
    pub fn write(&mut self, level: u8, fragments: &[&dyn Display]) -> Result<bool> {
        if !self.enabled(level) {
            return Ok(false);
        }

        let mut line = chrono::Local::now().format(TIMESTAMP_FORMAT).to_string();
        for fragment in fragments {
            line.push(' ');
            line.push_str(&fragment.to_string());
        }
        line.push('\n');

        self.sink
            .write_all(line.as_bytes())
            .and_then(|_| self.sink.flush())
            .map_err(|source| CollectorError::LogWrite {
                path: self.destination().to_string(),
                source,
            })?;

        Ok(true)
    }

    /// Flushes and releases the destination.
    pub fn close(mut self) -> Result<()> {
        self.sink.flush().map_err(|source| CollectorError::LogWrite {
            path: self.destination().to_string(),
            source,
        })
    }
}

/// Writes to a [`RunLog`] with any number of `Display` fragments.
///
/// ```
/// use dnac_interface_collector::{runlog, runlog::RunLog};
///
/// let mut log = RunLog::stdout(2);
/// let written = runlog!(log, 3, "[es.index]", 1, "creation.").unwrap();
/// assert!(written);
/// ```
#[macro_export]
macro_rules! runlog {
    ($log:expr, $level:expr $(, $fragment:expr)* $(,)?) => {
        $log.write($level, &[$(&$fragment as &dyn ::std::fmt::Display),*])
    };
}
