//! Analyst report list and the simulated upload that feeds it.
//!
//! Only metadata is kept. Downloads and the export fabricate their text from
//! that metadata at request time.

use crate::error::{AppError, AppResult};
use crate::models::{ReportFile, ReportStatus, UploadFile};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use uuid::Uuid;

pub const EXPORT_FILE_NAME: &str = "all_reports_export.txt";
const PROGRESS_STEP: u8 = 10;

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum UploadState {
    Idle,
    #[serde(rename_all = "camelCase")]
    Uploading { batch_id: Uuid, progress: u8 },
    #[serde(rename_all = "camelCase")]
    Succeeded { batch_id: Uuid, count: usize },
}

impl UploadState {
    pub fn is_uploading(&self) -> bool {
        matches!(self, UploadState::Uploading { .. })
    }
}

pub struct ReportManager {
    files: Vec<ReportFile>,
    upload: UploadState,
    batch: Vec<UploadFile>,
}

impl ReportManager {
    pub fn new(files: Vec<ReportFile>) -> Self {
        ReportManager {
            files,
            upload: UploadState::Idle,
            batch: Vec::new(),
        }
    }

    pub fn files(&self) -> &[ReportFile] {
        &self.files
    }

    pub fn get(&self, id: i64) -> AppResult<&ReportFile> {
        self.files
            .iter()
            .find(|f| f.id == id)
            .ok_or_else(|| AppError::NotFound(format!("Report {} not found", id)))
    }

    pub fn upload_state(&self) -> &UploadState {
        &self.upload
    }

    /// Start a new upload batch at 0%.
    pub fn begin_upload(&mut self, files: Vec<UploadFile>) -> AppResult<Uuid> {
        if self.upload.is_uploading() {
            return Err(AppError::Conflict("An upload is already running".to_string()));
        }
        if files.is_empty() {
            return Err(AppError::BadRequest("No files selected".to_string()));
        }
        if files.iter().any(|f| f.name.trim().is_empty()) {
            return Err(AppError::BadRequest("File name is required".to_string()));
        }

        let batch_id = Uuid::new_v4();
        tracing::info!("Upload {} started with {} file(s)", batch_id, files.len());
        self.batch = files;
        self.upload = UploadState::Uploading {
            batch_id,
            progress: 0,
        };
        Ok(batch_id)
    }

    /// Advance the running upload by one step. The tick after progress
    /// reaches 100 turns the batch into report entries.
    pub fn tick(&mut self, now: DateTime<Utc>) -> &UploadState {
        if let UploadState::Uploading { batch_id, progress } = self.upload {
            if progress >= 100 {
                let count = self.commit_batch(now);
                tracing::info!("Upload {} finished, {} file(s) added", batch_id, count);
                self.upload = UploadState::Succeeded { batch_id, count };
            } else {
                self.upload = UploadState::Uploading {
                    batch_id,
                    progress: (progress + PROGRESS_STEP).min(100),
                };
            }
        }
        &self.upload
    }

    /// Hide the "upload complete" banner.
    pub fn dismiss_upload(&mut self) {
        if !self.upload.is_uploading() {
            self.upload = UploadState::Idle;
        }
    }

    fn commit_batch(&mut self, now: DateTime<Utc>) -> usize {
        // Ids come from the clock but must never repeat
        let next_free = self.files.iter().map(|f| f.id + 1).max().unwrap_or(1);
        let base = now.timestamp_millis().max(next_free);

        let added: Vec<ReportFile> = std::mem::take(&mut self.batch)
            .into_iter()
            .enumerate()
            .map(|(index, file)| ReportFile {
                id: base + index as i64,
                name: file.name,
                upload_date: now.date_naive(),
                size_label: size_label(file.size_bytes),
                status: ReportStatus::Completed,
            })
            .collect();

        let count = added.len();
        self.files.splice(0..0, added);
        count
    }

    /// Remove the report with `id`. Nothing else moves.
    pub fn delete(&mut self, id: i64) -> AppResult<ReportFile> {
        let index = self
            .files
            .iter()
            .position(|f| f.id == id)
            .ok_or_else(|| AppError::NotFound(format!("Report {} not found", id)))?;
        Ok(self.files.remove(index))
    }

    /// Every report's metadata in one text payload.
    /// Offered as a "ZIP" export, though it is plain text.
    pub fn export_all(&self) -> AppResult<String> {
        if self.files.is_empty() {
            return Err(AppError::Conflict("No reports to export".to_string()));
        }
        Ok(self
            .files
            .iter()
            .map(|f| format!("{}\nUploaded: {}\nSize: {}\n\n", f.name, f.upload_date, f.size_label))
            .collect::<Vec<_>>()
            .join("---\n"))
    }
}

pub fn size_label(bytes: u64) -> String {
    format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
}

/// Placeholder body served when a report is downloaded.
pub fn download_content(file: &ReportFile) -> String {
    format!(
        "This is a sample file content for {}\n\nFile name: {}\nUpload date: {}\nSize: {}",
        file.name, file.name, file.upload_date, file.size_label
    )
}

/// Drive the running upload to completion, one tick per `interval`.
pub async fn run_upload(manager: Arc<Mutex<ReportManager>>, interval: Duration) {
    loop {
        tokio::time::sleep(interval).await;
        let mut manager = manager.lock().await;
        match manager.tick(Utc::now()) {
            UploadState::Uploading { progress, .. } => {
                tracing::debug!("Upload progress {}%", progress);
            }
            UploadState::Succeeded { .. } | UploadState::Idle => break,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::mock::sample_reports;

    fn upload(name: &str, size_bytes: u64) -> UploadFile {
        UploadFile {
            name: name.to_string(),
            size_bytes,
        }
    }

    fn finish(manager: &mut ReportManager) {
        let now = Utc::now();
        while manager.tick(now).is_uploading() {}
    }

    #[test]
    fn progress_climbs_in_steps_of_ten() {
        let mut manager = ReportManager::new(sample_reports());
        manager.begin_upload(vec![upload("a.pdf", 10)]).unwrap();

        let mut seen = Vec::new();
        let now = Utc::now();
        while let UploadState::Uploading { progress, .. } = manager.tick(now).clone() {
            seen.push(progress);
        }
        assert_eq!(seen, (1..=10).map(|n| n * 10).collect::<Vec<u8>>());
        assert!(matches!(
            manager.upload_state(),
            UploadState::Succeeded { count: 1, .. }
        ));
    }

    #[test]
    fn uploading_one_file_adds_one_completed_entry() {
        let mut manager = ReportManager::new(sample_reports());
        let before = manager.files().len();
        manager
            .begin_upload(vec![upload("Q3_2023_MSFT.pdf", 3 * 1024 * 1024 / 2)])
            .unwrap();
        finish(&mut manager);

        assert_eq!(manager.files().len(), before + 1);
        let added = &manager.files()[0];
        assert_eq!(added.name, "Q3_2023_MSFT.pdf");
        assert_eq!(added.status, ReportStatus::Completed);
        assert_eq!(added.size_label, "1.5 MB");
    }

    #[test]
    fn batch_is_prepended_in_order_with_unique_ids() {
        let mut manager = ReportManager::new(sample_reports());
        manager
            .begin_upload(vec![upload("one.csv", 1), upload("two.csv", 2)])
            .unwrap();
        finish(&mut manager);

        let names: Vec<&str> = manager.files().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(
            names,
            [
                "one.csv",
                "two.csv",
                "Q2_2023_AAPL_Analysis.xlsx",
                "Competitor_Analysis_Q2.xlsx",
                "Market_Trends_2023.pdf"
            ]
        );
        let mut ids: Vec<i64> = manager.files().iter().map(|f| f.id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 5);
    }

    #[test]
    fn ids_never_collide_with_existing_ones() {
        let clock = DateTime::from_timestamp_millis(5).unwrap();
        let mut manager = ReportManager::new(sample_reports());
        manager.begin_upload(vec![upload("x", 1)]).unwrap();
        while manager.tick(clock).is_uploading() {}
        assert_eq!(manager.files()[0].id, 5);

        manager.begin_upload(vec![upload("y", 1)]).unwrap();
        while manager.tick(clock).is_uploading() {}
        assert_eq!(manager.files()[0].id, 6);
    }

    #[test]
    fn second_batch_while_uploading_conflicts() {
        let mut manager = ReportManager::new(Vec::new());
        manager.begin_upload(vec![upload("a", 1)]).unwrap();
        let err = manager.begin_upload(vec![upload("b", 1)]).unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[test]
    fn empty_batch_is_rejected() {
        let mut manager = ReportManager::new(Vec::new());
        assert!(matches!(
            manager.begin_upload(Vec::new()),
            Err(AppError::BadRequest(_))
        ));
        assert_eq!(manager.upload_state(), &UploadState::Idle);
    }

    #[test]
    fn delete_removes_exactly_the_matching_id() {
        let mut manager = ReportManager::new(sample_reports());
        let removed = manager.delete(2).unwrap();
        assert_eq!(removed.name, "Competitor_Analysis_Q2.xlsx");
        let ids: Vec<i64> = manager.files().iter().map(|f| f.id).collect();
        assert_eq!(ids, [1, 3]);

        assert!(matches!(manager.delete(2), Err(AppError::NotFound(_))));
        assert_eq!(manager.files().len(), 2);
    }

    #[test]
    fn export_joins_every_report() {
        let manager = ReportManager::new(sample_reports());
        let text = manager.export_all().unwrap();
        assert!(text.starts_with("Q2_2023_AAPL_Analysis.xlsx\nUploaded: 2023-07-15\nSize: 2.4 MB\n\n---\n"));
        assert_eq!(text.matches("---\n").count(), 2);
    }

    #[test]
    fn export_of_empty_list_is_refused() {
        let manager = ReportManager::new(Vec::new());
        assert!(matches!(manager.export_all(), Err(AppError::Conflict(_))));
    }

    #[test]
    fn download_fabricates_text() {
        let reports = sample_reports();
        let body = download_content(&reports[2]);
        assert_eq!(
            body,
            "This is a sample file content for Market_Trends_2023.pdf\n\n\
             File name: Market_Trends_2023.pdf\nUpload date: 2023-06-28\nSize: 5.2 MB"
        );
    }

    #[test]
    fn dismiss_only_after_upload() {
        let mut manager = ReportManager::new(Vec::new());
        manager.begin_upload(vec![upload("a", 1)]).unwrap();
        manager.dismiss_upload();
        assert!(manager.upload_state().is_uploading());
        finish(&mut manager);
        manager.dismiss_upload();
        assert_eq!(manager.upload_state(), &UploadState::Idle);
    }

    #[tokio::test]
    async fn run_upload_drives_to_completion() {
        let manager = Arc::new(Mutex::new(ReportManager::new(Vec::new())));
        manager
            .lock()
            .await
            .begin_upload(vec![upload("a.txt", 2048)])
            .unwrap();
        run_upload(manager.clone(), Duration::ZERO).await;

        let manager = manager.lock().await;
        assert_eq!(manager.files().len(), 1);
        assert_eq!(manager.files()[0].size_label, "0.0 MB");
    }
}
