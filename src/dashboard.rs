//! Display strings derived from the session. Nothing here mutates state.

use crate::session::{RunStatus, Session};

pub fn format_elapsed(secs: u64) -> String {
    if secs < 60 {
        format!("{secs}s")
    } else {
        format!("{}m {}s", secs / 60, secs % 60)
    }
}

pub fn format_error(error: Option<f64>) -> String {
    error.map_or_else(|| "-".to_string(), |e| format!("{e:.4}"))
}

/// Completed share of the run, `0..=1`.
pub fn progress(session: &Session) -> f32 {
    let run = &session.run;
    if run.epoch_limit == 0 {
        return 0.0;
    }
    (run.current_epoch as f32 / run.epoch_limit as f32).min(1.0)
}

pub fn status_line(session: &Session) -> &'static str {
    if session.run.status == RunStatus::Running {
        "Training in progress..."
    } else if session.topology.is_some() && session.dataset.is_some() {
        "Ready to train"
    } else {
        "Ready"
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatCards {
    pub network: String,
    pub dataset: String,
    pub error: String,
    pub epoch: String,
    pub total_neurons: Option<usize>,
}

impl StatCards {
    pub fn from_session(session: &Session) -> Self {
        let epoch_limit = if session.run.is_active() || session.run.current_epoch > 0 {
            session.run.epoch_limit
        } else {
            session.params.epochs
        };
        Self {
            network: session
                .topology
                .as_ref()
                .map_or_else(|| "Not created".into(), |t| format!("{} layers", t.layer_count())),
            dataset: session
                .dataset
                .as_ref()
                .map_or_else(|| "Not loaded".into(), |d| d.file_name().to_string()),
            error: format_error(session.run.latest_error()),
            epoch: format!("{}/{}", session.run.current_epoch, epoch_limit),
            total_neurons: session.topology.as_ref().map(|t| t.total_neurons()),
        }
    }
}
