use std::borrow::Cow;
use std::path::{Path, PathBuf};

use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::warn;

use crate::error::RecordError;

use super::{FieldTable, Record};

/// Sequential reader over one record file. The header line is consumed on
/// [`RecordReader::open`]; [`RecordReader::rewind`] starts a new pass.
///
/// Bytes that are not valid UTF-8 are replaced with U+FFFD instead of
/// failing the read.
#[derive(Debug)]
pub struct RecordReader {
    path: PathBuf,
    input: Option<BufReader<File>>,
    sequence: u64,
}

impl RecordReader {
    #[must_use]
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            input: None,
            sequence: 0,
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Opens the file and reads its header line.
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be opened or read, or when it is
    /// empty.
    pub async fn open(&mut self) -> Result<FieldTable, RecordError> {
        let file = File::open(&self.path)
            .await
            .map_err(|err| RecordError::Open {
                path: self.path.clone(),
                source: err,
            })?;
        let mut input = BufReader::new(file);
        let header = read_line(&mut input, &self.path)
            .await?
            .ok_or_else(|| RecordError::MissingHeader {
                path: self.path.clone(),
            })?;
        self.input = Some(input);
        self.sequence = 0;
        Ok(FieldTable::parse(&self.path.to_string_lossy(), &header))
    }

    /// Reopens the file for another pass, skipping the header.
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be reopened.
    pub async fn rewind(&mut self) -> Result<(), RecordError> {
        self.open().await.map(drop)
    }

    /// Next non-empty record, or `None` at end of input.
    ///
    /// # Errors
    ///
    /// Returns an error when the underlying read fails.
    pub async fn next_record(&mut self) -> Result<Option<Record>, RecordError> {
        let input = self.input.as_mut().ok_or_else(|| RecordError::NotOpened {
            path: self.path.clone(),
        })?;
        loop {
            let Some(line) = read_line(input, &self.path).await? else {
                return Ok(None);
            };
            if line.trim().is_empty() {
                continue;
            }
            self.sequence = self.sequence.saturating_add(1);
            return Ok(Some(Record::parse(self.sequence, &line)));
        }
    }
}

/// One line without its `\n` or `\r\n` terminator, decoded lossily.
async fn read_line(
    input: &mut BufReader<File>,
    path: &Path,
) -> Result<Option<String>, RecordError> {
    let mut raw = Vec::new();
    let read = input
        .read_until(b'\n', &mut raw)
        .await
        .map_err(|err| RecordError::Read {
            path: path.to_path_buf(),
            source: err,
        })?;
    if read == 0 {
        return Ok(None);
    }
    let line = match String::from_utf8_lossy(&raw) {
        Cow::Borrowed(text) => text.to_owned(),
        Cow::Owned(text) => {
            warn!("Replaced invalid UTF-8 in a line of '{}'", path.display());
            text
        }
    };
    Ok(Some(line.trim_end_matches(['\r', '\n']).to_owned()))
}
