//! Batch ranking: parse each resume, then compare it to one job description.
//!
//! Items are processed strictly one after another. A failure on one file is
//! recorded and the batch moves on to the next file.

use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::analysis::ranking::Ranked;
use crate::analysis::service::Analyzer;
use crate::models::analysis::ComparisonResult;
use crate::models::resume::ParsedResume;
use crate::models::upload::UploadedFile;

/// One successfully analysed resume. `candidate_id` is the stable handle used
/// for later lookups; names are not unique.
#[derive(Debug, Clone, Serialize)]
pub struct BatchEntry {
    pub candidate_id: Uuid,
    pub file_name: String,
    pub resume: ParsedResume,
    pub comparison: ComparisonResult,
}

impl Ranked for BatchEntry {
    fn match_score(&self) -> u8 {
        self.comparison.match_score
    }

    fn candidate_name(&self) -> &str {
        &self.comparison.name
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchStage {
    Parse,
    Compare,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchFailure {
    pub file_name: String,
    pub stage: BatchStage,
    pub message: String,
}

/// Emitted after every item, successful or not.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchProgress {
    pub completed: usize,
    pub total: usize,
    pub file_name: String,
}

impl BatchProgress {
    pub fn fraction(&self) -> f32 {
        if self.total == 0 {
            1.0
        } else {
            self.completed as f32 / self.total as f32
        }
    }
}

/// Entries in input order plus the files that failed.
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    pub entries: Vec<BatchEntry>,
    pub failures: Vec<BatchFailure>,
}

pub async fn run_batch<P>(
    analyzer: &Analyzer,
    files: &[UploadedFile],
    job_description: &str,
    mut on_progress: P,
) -> BatchReport
where
    P: FnMut(&BatchProgress),
{
    let total = files.len();
    let mut report = BatchReport::default();

    for (i, file) in files.iter().enumerate() {
        match analyze_one(analyzer, file, job_description).await {
            Ok(entry) => report.entries.push(entry),
            Err(failure) => {
                warn!(
                    "Batch item '{}' failed at {:?}: {}",
                    failure.file_name, failure.stage, failure.message
                );
                report.failures.push(failure);
            }
        }

        let progress = BatchProgress {
            completed: i + 1,
            total,
            file_name: file.file_name.clone(),
        };
        info!("Analyzed {} ({}/{})", file.file_name, progress.completed, total);
        on_progress(&progress);
    }

    report
}

async fn analyze_one(
    analyzer: &Analyzer,
    file: &UploadedFile,
    job_description: &str,
) -> Result<BatchEntry, BatchFailure> {
    let resume = analyzer
        .parse_resume(file)
        .await
        .map_err(|e| BatchFailure {
            file_name: file.file_name.clone(),
            stage: BatchStage::Parse,
            message: format!("Error parsing resume '{}': {e}", file.file_name),
        })?;
    debug!(
        "Parsed '{}' as {}",
        file.file_name,
        resume.display_name(&file.file_name)
    );

    let comparison = analyzer
        .compare_to_jd(&resume, job_description)
        .await
        .map_err(|e| BatchFailure {
            file_name: file.file_name.clone(),
            stage: BatchStage::Compare,
            message: format!("Error during comparison of '{}': {e}", file.file_name),
        })?;

    Ok(BatchEntry {
        candidate_id: Uuid::new_v4(),
        file_name: file.file_name.clone(),
        resume,
        comparison,
    })
}
