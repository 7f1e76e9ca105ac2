use std::path::Path;

use chrono::{DateTime, Local};
use tokio::fs::{File, OpenOptions};
use tokio::io::{AsyncWrite, AsyncWriteExt, BufWriter};

use crate::error::SinkError;

use super::format::csv_field;

/// `chrono` format of the first column of every row.
pub const TIMESTAMP_FORMAT: &str = "%d/%m/%Y %H:%M:%S%.3f";
/// How the timestamp column is named in the header row.
pub const HEADER_TIMESTAMP_LABEL: &str = "timestamp (dd/MM/yyyy HH:mm:ss.fff)";

const HEADER_LABEL: &str = "agent uid";
const HEADER_ELAPSED: &str = "milliseconds to process request";
const ERROR_PREFIX: &str = "ERROR: ";

pub type FileSink = ResultSink<BufWriter<File>>;

/// Append-only CSV writer for one worker. Every row is flushed as soon as it
/// is written.
#[derive(Debug)]
pub struct ResultSink<W> {
    writer: W,
    rows: u64,
}

impl FileSink {
    /// Opens `path` for appending, creating it when missing.
    ///
    /// # Errors
    ///
    /// Returns `SinkError::Open` when the file cannot be opened.
    pub async fn open(path: &Path) -> Result<Self, SinkError> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .await
            .map_err(|err| SinkError::Open {
                path: path.to_path_buf(),
                source: err,
            })?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W> ResultSink<W>
where
    W: AsyncWrite + Unpin,
{
    pub const fn new(writer: W) -> Self {
        Self { writer, rows: 0 }
    }

    /// Data rows written so far (the header is not counted).
    #[must_use]
    pub const fn rows(&self) -> u64 {
        self.rows
    }

    /// Writes the column header; `labelled` adds the row label column.
    ///
    /// # Errors
    ///
    /// Returns an error when the write or flush fails.
    pub async fn write_header(&mut self, labelled: bool) -> Result<(), SinkError> {
        let line = if labelled {
            format!(
                "{},{},{}",
                HEADER_TIMESTAMP_LABEL, HEADER_LABEL, HEADER_ELAPSED
            )
        } else {
            format!("{},{}", HEADER_TIMESTAMP_LABEL, HEADER_ELAPSED)
        };
        self.write_row(&line).await
    }

    /// # Errors
    ///
    /// Returns an error when the write or flush fails.
    pub async fn write_success(
        &mut self,
        timestamp: DateTime<Local>,
        label: Option<&str>,
        elapsed_ms: u64,
    ) -> Result<(), SinkError> {
        let line = format!(
            "{}{}",
            row_prefix(timestamp, label),
            elapsed_ms
        );
        self.write_row(&line).await?;
        self.rows = self.rows.saturating_add(1);
        Ok(())
    }

    /// Writes an error row. Separators inside `message` are replaced with
    /// spaces so the row stays a single CSV record.
    ///
    /// # Errors
    ///
    /// Returns an error when the write or flush fails.
    pub async fn write_error(
        &mut self,
        timestamp: DateTime<Local>,
        label: Option<&str>,
        message: &str,
    ) -> Result<(), SinkError> {
        let line = format!(
            "{}{}{}",
            row_prefix(timestamp, label),
            ERROR_PREFIX,
            csv_field(message)
        );
        self.write_row(&line).await?;
        self.rows = self.rows.saturating_add(1);
        Ok(())
    }

    /// Flushes and shuts down the underlying writer.
    ///
    /// # Errors
    ///
    /// Returns `SinkError::Flush` when the writer cannot be shut down.
    pub async fn close(&mut self) -> Result<(), SinkError> {
        self.writer
            .shutdown()
            .await
            .map_err(|err| SinkError::Flush { source: err })
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    async fn write_row(&mut self, line: &str) -> Result<(), SinkError> {
        self.writer
            .write_all(line.as_bytes())
            .await
            .map_err(|err| SinkError::WriteRow { source: err })?;
        self.writer
            .write_all(b"\n")
            .await
            .map_err(|err| SinkError::WriteRow { source: err })?;
        self.writer
            .flush()
            .await
            .map_err(|err| SinkError::Flush { source: err })
    }
}

fn row_prefix(timestamp: DateTime<Local>, label: Option<&str>) -> String {
    let stamp = timestamp.format(TIMESTAMP_FORMAT);
    match label {
        Some(label) => format!("{},{},", stamp, csv_field(label)),
        None => format!("{},", stamp),
    }
}
