//! The one mutable record behind the whole UI.

use std::collections::VecDeque;
use std::time::Duration;

use crate::config::TrainingParams;
use crate::error::{Precondition, SessionError};
use crate::journal::{ActivityFeed, LogSink};
use crate::model::{ConfusionMatrix, DatasetDescriptor, ErrorSample, NetworkTopology, TrainingHistoryEntry};
use crate::scheduler::date_time_label;

pub const MAX_HISTORY: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunStatus {
    #[default]
    Idle,
    Running,
    Stopped,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrainingRun {
    pub status: RunStatus,
    pub current_epoch: u32,
    pub epoch_limit: u32,
    pub samples: Vec<ErrorSample>,
    pub started_at: Option<Duration>,
    pub elapsed_secs: u64,
}

impl Default for TrainingRun {
    fn default() -> Self {
        Self {
            status: RunStatus::Idle,
            current_epoch: 0,
            epoch_limit: TrainingParams::default().epochs,
            samples: Vec::new(),
            started_at: None,
            elapsed_secs: 0,
        }
    }
}

impl TrainingRun {
    pub fn is_active(&self) -> bool {
        self.status == RunStatus::Running
    }

    pub fn latest_error(&self) -> Option<f64> {
        self.samples.last().map(|s| s.error)
    }

    pub fn min_error(&self) -> Option<f64> {
        self.samples.iter().map(|s| s.error).reduce(f64::min)
    }
}

/// Newest first, never more than [`MAX_HISTORY`] entries.
#[derive(Debug, Default)]
pub struct TrainingHistory {
    entries: VecDeque<TrainingHistoryEntry>,
}

impl TrainingHistory {
    pub fn push(&mut self, entry: TrainingHistoryEntry) {
        self.entries.push_front(entry);
        self.entries.truncate(MAX_HISTORY);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &TrainingHistoryEntry> {
        self.entries.iter()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.entries)
    }
}

#[derive(Debug, Default)]
pub struct Session {
    pub topology: Option<NetworkTopology>,
    pub dataset: Option<DatasetDescriptor>,
    pub params: TrainingParams,
    pub run: TrainingRun,
    pub confusion: Option<ConfusionMatrix>,
    pub accuracy: Option<f64>,
    pub history: TrainingHistory,
    pub log: LogSink,
    pub activity: ActivityFeed,
}

impl Session {
    pub fn new() -> Self {
        let mut session = Self::default();
        session.log.info("Application initialized");
        session.activity.record("Application started");
        session
    }

    /// Replaces the network wholesale; results of earlier runs no longer apply.
    pub fn create_network(&mut self, topology: NetworkTopology) {
        tracing::debug!(layers = topology.layer_count(), "network created");
        self.topology = Some(topology);
        self.confusion = None;
        self.accuracy = None;
        self.log.success("Network created successfully");
        self.activity.record("Network created");
    }

    pub fn load_dataset(&mut self, dataset: DatasetDescriptor) -> Result<(), SessionError> {
        if dataset.source.trim().is_empty() {
            return Err(self.refuse(Precondition::NoDatasetFile));
        }
        self.log.success(format!("Dataset loaded: {}", dataset.source));
        self.activity
            .record(format!("Dataset loaded: {}", dataset.file_name()));
        self.dataset = Some(dataset);
        Ok(())
    }

    pub fn save_params(&mut self, params: TrainingParams) {
        self.log.info(format!(
            "Training parameters saved: LR={}, Epochs={}",
            params.learning_rate, params.epochs
        ));
        self.params = params;
    }

    pub fn clear_chart(&mut self) {
        self.run.samples.clear();
        self.log.info("Chart cleared");
    }

    pub fn clear_log(&mut self) {
        self.log.clear();
        self.log.info("Log cleared");
    }

    /// Logs the unmet precondition as a warning and hands back the error.
    pub fn refuse(&mut self, reason: Precondition) -> SessionError {
        self.log.warning(reason.to_string());
        SessionError::PreconditionNotMet(reason)
    }

    /// Snapshot of the current run; `None` when nothing was recorded.
    pub fn history_entry(&self) -> Option<TrainingHistoryEntry> {
        let last = self.run.samples.last()?;
        Some(TrainingHistoryEntry {
            timestamp: date_time_label(),
            epochs_run: last.epoch,
            final_error: last.error,
            min_error: self.run.min_error().unwrap_or(last.error),
            duration_secs: self.run.elapsed_secs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::journal::Severity;

    fn entry(epochs: u32) -> TrainingHistoryEntry {
        TrainingHistoryEntry {
            timestamp: String::new(),
            epochs_run: epochs,
            final_error: 0.5,
            min_error: 0.4,
            duration_secs: 1,
        }
    }

    #[test]
    fn history_evicts_oldest_after_ten() {
        let mut history = TrainingHistory::default();
        for i in 1..=11 {
            history.push(entry(i));
        }
        assert_eq!(history.len(), MAX_HISTORY);
        assert_eq!(history.iter().next().map(|e| e.epochs_run), Some(11));
        assert_eq!(history.iter().last().map(|e| e.epochs_run), Some(2));
    }

    #[test]
    fn history_exports_as_json_array() {
        let mut history = TrainingHistory::default();
        history.push(entry(3));
        let json = history.to_json().unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed[0]["epochs_run"], 3);
    }

    #[test]
    fn empty_dataset_path_is_refused_with_warning() {
        let mut session = Session::new();
        let result = session.load_dataset(DatasetDescriptor {
            source: "  ".into(),
            inputs: 2,
            outputs: 1,
            has_header: false,
            loaded: String::new(),
        });
        assert_eq!(
            result,
            Err(SessionError::PreconditionNotMet(Precondition::NoDatasetFile))
        );
        assert!(session.dataset.is_none());
        assert_eq!(session.log.count(Severity::Warning), 1);
    }

    #[test]
    fn min_error_scans_all_samples() {
        let mut run = TrainingRun::default();
        assert_eq!(run.min_error(), None);
        run.samples = vec![
            ErrorSample { epoch: 1, error: 0.7 },
            ErrorSample { epoch: 2, error: 0.2 },
            ErrorSample { epoch: 3, error: 0.3 },
        ];
        assert_eq!(run.min_error(), Some(0.2));
        assert_eq!(run.latest_error(), Some(0.3));
    }
}
