//! Replays BAM events from per-worker event files, batching several events
//! into one report.
use std::collections::HashSet;
use std::hash::Hash;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::error::{AppError, PayloadError, RecordError, ValidationError};
use crate::harness::{Batch, HarnessConfig, Partition, RunPlan, Workload};
use crate::payload::{Document, NodePath};
use crate::policy::{POLICY_TABLES, PolicySet, Section};
use crate::records::{Column, Record, RecordReader};

use super::CounterInfo;

pub const COUNTER: CounterInfo = CounterInfo {
    name: "Event Generator",
    help: "Milliseconds each batch of events took until the event collector answered.",
};

pub const BAM_TEMPLATE: &str = "<root><baminfo>\
<attribute name=\"BAMType\" value=\"\" />\
<attribute name=\"BAMUniqueID\" value=\"\" />\
</baminfo></root>";

const BAM_TYPE: &str = "BAMType";
const BAM_UNIQUE_ID: &str = "BAMUniqueID";
const EVENT_TAG: &str = "event";
const EVENT_ID: &str = "eventId";
const RESULTS_SUFFIX: &str = "_results_.csv";

#[derive(Debug)]
struct BoundEvents {
    bam_type: Column,
    bam_unique_id: Column,
    policies: PolicySet,
}

/// Events from one event file: a header line naming the fields, then one
/// event per line.
#[derive(Debug)]
pub struct EventWorkload {
    reader: RecordReader,
    bound: Option<BoundEvents>,
}

impl EventWorkload {
    #[must_use]
    pub fn new(path: &Path) -> Self {
        Self {
            reader: RecordReader::new(path),
            bound: None,
        }
    }

    fn bound(&self) -> Result<&BoundEvents, RecordError> {
        self.bound.as_ref().ok_or_else(|| RecordError::NotOpened {
            path: self.reader.path().to_path_buf(),
        })
    }
}

#[async_trait]
impl Workload for EventWorkload {
    type Unit = Record;
    const LABELLED: bool = false;

    async fn prepare(&mut self) -> Result<(), AppError> {
        let fields = self.reader.open().await?;
        let bound = BoundEvents {
            bam_type: fields.column(BAM_TYPE)?,
            bam_unique_id: fields.column(BAM_UNIQUE_ID)?,
            policies: PolicySet::bind(&POLICY_TABLES, &fields),
        };
        debug!(
            "Bound {} fields of '{}'",
            fields.len(),
            fields.source_name()
        );
        self.bound = Some(bound);
        Ok(())
    }

    async fn rewind(&mut self) -> Result<(), AppError> {
        self.reader.rewind().await?;
        Ok(())
    }

    async fn next_unit(&mut self) -> Result<Option<Record>, AppError> {
        Ok(self.reader.next_record().await?)
    }

    fn new_document(&self) -> Result<Document, PayloadError> {
        Document::from_template(BAM_TEMPLATE)
    }

    fn append(&mut self, batch: &mut Batch, record: &Record) -> Result<(), PayloadError> {
        let bound = self.bound()?;
        let index = batch.next_index().to_string();
        let event_path = NodePath::keyed(EVENT_TAG, EVENT_ID, &index);

        let document = batch.document_mut();
        document.add_node(None, EVENT_TAG, &[(EVENT_ID, index.as_str())])?;
        document.add_node(Some(&event_path), Section::BusinessData.tag(), &[])?;
        document.add_node(Some(&event_path), Section::PolicyData.tag(), &[])?;

        if batch.header_pending() {
            let bam_type = bound.bam_type.value(record)?;
            let unique_id = bound.bam_unique_id.value(record)?;
            batch.document_mut().set_first_attr(BAM_TYPE, bam_type)?;
            batch.document_mut().set_first_attr(BAM_UNIQUE_ID, unique_id)?;
            batch.set_discriminator(bam_type);
        }

        let discriminator = batch.discriminator().unwrap_or_default().to_owned();
        match bound.policies.lookup(&discriminator) {
            Some(policy) => policy?.apply(batch.document_mut(), &event_path, record),
            None => {
                warn!(
                    "Unknown BAM type '{}' in unit {} of '{}'",
                    discriminator,
                    record.sequence(),
                    self.reader.path().display()
                );
                Ok(())
            }
        }
    }
}

/// Reads the index file: one event file per line, blank lines ignored.
///
/// # Errors
///
/// Returns an error when the index or any file it names does not exist, or
/// when it names no files at all.
pub async fn read_index(index: &Path) -> Result<Vec<PathBuf>, ValidationError> {
    let content = tokio::fs::read_to_string(index)
        .await
        .map_err(|err| {
            if err.kind() == std::io::ErrorKind::NotFound {
                ValidationError::InputFileMissing {
                    path: index.to_path_buf(),
                }
            } else {
                ValidationError::ReadInputList {
                    path: index.to_path_buf(),
                    source: err,
                }
            }
        })?;

    let mut files = Vec::new();
    for line in content.lines() {
        let name = line.trim();
        if name.is_empty() {
            continue;
        }
        let path = PathBuf::from(name);
        if tokio::fs::metadata(&path).await.is_err() {
            return Err(ValidationError::InputFileMissing { path });
        }
        files.push(path);
    }

    if files.is_empty() {
        return Err(ValidationError::InputListEmpty {
            path: index.to_path_buf(),
        });
    }
    Ok(files)
}

/// `<output dir>/<event file name>_results_.csv`
#[must_use]
pub fn results_path(output_dir: &Path, event_file: &Path) -> PathBuf {
    output_dir.join(format!("{}{}", file_label(event_file), RESULTS_SUFFIX))
}

fn file_label(event_file: &Path) -> String {
    event_file
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| event_file.to_string_lossy().into_owned())
}

/// Inserts `preferred`, or the first free `copy_of(n)` when it is taken.
fn claim<T, F>(taken: &mut HashSet<T>, preferred: T, copy_of: F) -> T
where
    T: Clone + Eq + Hash,
    F: Fn(usize) -> T,
{
    let mut candidate = preferred;
    let mut copy = 0_usize;
    while !taken.insert(candidate.clone()) {
        copy = copy.saturating_add(1);
        candidate = copy_of(copy);
    }
    candidate
}

/// One partition per event file. Files sharing a base name get a numbered
/// results file so no two workers append to the same one.
#[must_use]
pub fn plan(files: &[PathBuf], output_dir: &Path, config: HarnessConfig) -> RunPlan<EventWorkload> {
    let mut names = HashSet::new();
    let mut outputs = HashSet::new();
    let mut partitions = Vec::with_capacity(files.len());
    for file in files {
        let shown = file.display().to_string();
        let name = claim(&mut names, shown.clone(), |copy| format!("{} ({})", shown, copy));
        let label = file_label(file);
        let results = claim(&mut outputs, results_path(output_dir, file), |copy| {
            output_dir.join(format!("{}_{}{}", label, copy, RESULTS_SUFFIX))
        });
        if results != results_path(output_dir, file) {
            warn!(
                "Results of '{}' go to {} to avoid a name clash",
                shown,
                results.display()
            );
        }
        partitions.push(Partition {
            name,
            results_path: results,
            workload: EventWorkload::new(file),
        });
    }
    RunPlan { config, partitions }
}
