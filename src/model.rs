use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Activation {
    #[default]
    Sigmoid,
    ReLU,
    Tanh,
    Linear,
}

impl Activation {
    pub const ALL: [Activation; 4] = [
        Activation::Sigmoid,
        Activation::ReLU,
        Activation::Tanh,
        Activation::Linear,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Activation::Sigmoid => "Sigmoid",
            Activation::ReLU => "ReLU",
            Activation::Tanh => "Tanh",
            Activation::Linear => "Linear",
        }
    }
}

impl fmt::Display for Activation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LayerSpec {
    pub neurons: usize,
    pub activation: Activation,
    pub is_input: bool,
}

/// Layer layout used purely for drawing; there are no weights behind it.
#[derive(Debug, Clone, PartialEq)]
pub struct NetworkTopology {
    layers: Vec<LayerSpec>,
    created: String,
}

impl NetworkTopology {
    pub fn builder() -> TopologyBuilder {
        TopologyBuilder::default()
    }

    pub fn layers(&self) -> &[LayerSpec] {
        &self.layers
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    pub fn total_neurons(&self) -> usize {
        self.layers.iter().map(|l| l.neurons).sum()
    }

    pub fn created(&self) -> &str {
        &self.created
    }

    /// The last layer is the output unless it is also the input layer.
    pub fn is_output(&self, layer_idx: usize) -> bool {
        layer_idx + 1 == self.layers.len() && !self.layers[layer_idx].is_input
    }
}

#[derive(Debug, Default, Clone)]
pub struct TopologyBuilder {
    layers: Vec<(usize, Activation)>,
    created: Option<String>,
}

impl TopologyBuilder {
    pub fn layer(mut self, neurons: usize, activation: Activation) -> Self {
        self.layers.push((neurons, activation));
        self
    }

    pub fn created(mut self, label: impl Into<String>) -> Self {
        self.created = Some(label.into());
        self
    }

    pub fn build(self) -> Result<NetworkTopology, ModelError> {
        if self.layers.is_empty() {
            return Err(ModelError::NoLayers);
        }
        let layers = self
            .layers
            .into_iter()
            .enumerate()
            .map(|(index, (neurons, activation))| {
                if neurons == 0 {
                    return Err(ModelError::EmptyLayer { index });
                }
                Ok(LayerSpec {
                    neurons,
                    activation,
                    is_input: index == 0,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(NetworkTopology {
            layers,
            created: self.created.unwrap_or_default(),
        })
    }
}

const TEMPLATES_JSON: &str = r#"[
    { "name": "simple", "layers": [2, 4, 1] },
    { "name": "medium", "layers": [2, 8, 4, 1] },
    { "name": "deep",   "layers": [4, 16, 8, 4, 1] }
]"#;

#[derive(Debug, Clone, Deserialize)]
pub struct NetworkTemplate {
    pub name: String,
    pub layers: Vec<usize>,
}

impl NetworkTemplate {
    /// Rows for the layer editor: a linear input followed by sigmoid layers.
    pub fn rows(&self) -> Vec<(usize, Activation)> {
        self.layers
            .iter()
            .enumerate()
            .map(|(i, &n)| {
                let act = if i == 0 {
                    Activation::Linear
                } else {
                    Activation::Sigmoid
                };
                (n, act)
            })
            .collect()
    }
}

pub fn templates() -> Result<Vec<NetworkTemplate>, ModelError> {
    Ok(serde_json::from_str(TEMPLATES_JSON)?)
}

pub fn template(name: &str) -> Result<NetworkTemplate, ModelError> {
    templates()?
        .into_iter()
        .find(|t| t.name == name)
        .ok_or_else(|| ModelError::UnknownTemplate {
            name: name.to_string(),
        })
}

/// Metadata about a dataset; no samples are ever read.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetDescriptor {
    pub source: String,
    pub inputs: usize,
    pub outputs: usize,
    pub has_header: bool,
    pub loaded: String,
}

impl DatasetDescriptor {
    pub fn file_name(&self) -> &str {
        self.source.rsplit('/').next().unwrap_or(&self.source)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ErrorSample {
    pub epoch: u32,
    pub error: f64,
}

/// Predicted-class rows by actual-class columns.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfusionMatrix {
    counts: Vec<Vec<u32>>,
}

impl ConfusionMatrix {
    pub fn new(counts: Vec<Vec<u32>>) -> Result<Self, ModelError> {
        let rows = counts.len();
        if rows == 0 {
            return Err(ModelError::NotSquare {
                rows,
                row: 0,
                len: 0,
            });
        }
        if let Some((row, r)) = counts.iter().enumerate().find(|(_, r)| r.len() != rows) {
            return Err(ModelError::NotSquare {
                rows,
                row,
                len: r.len(),
            });
        }
        Ok(Self { counts })
    }

    /// Fixed matrix shown once a simulated run completes.
    pub fn demo() -> Self {
        Self {
            counts: vec![vec![45, 5], vec![3, 47]],
        }
    }

    pub fn size(&self) -> usize {
        self.counts.len()
    }

    pub fn get(&self, predicted: usize, actual: usize) -> Option<u32> {
        self.counts.get(predicted)?.get(actual).copied()
    }

    pub fn rows(&self) -> &[Vec<u32>] {
        &self.counts
    }

    pub fn max_count(&self) -> u32 {
        self.counts.iter().flatten().copied().max().unwrap_or(0)
    }

    /// Binary scores with class 1 as the positive class. `None` unless the
    /// matrix is 2x2.
    pub fn scores(&self) -> Option<ClassScores> {
        if self.size() != 2 {
            return None;
        }
        let tp = f64::from(self.get(1, 1)?);
        let fp = f64::from(self.get(1, 0)?);
        let fn_ = f64::from(self.get(0, 1)?);
        let ratio = |num: f64, den: f64| if den > 0.0 { num / den } else { 0.0 };
        let precision = ratio(tp, tp + fp);
        let recall = ratio(tp, tp + fn_);
        Some(ClassScores {
            precision,
            recall,
            f1: ratio(2.0 * precision * recall, precision + recall),
        })
    }
}

/// Precision, recall and F1 of a binary confusion matrix. Each score is 0
/// when its denominator is 0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassScores {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrainingHistoryEntry {
    pub timestamp: String,
    pub epochs_run: u32,
    pub final_error: f64,
    pub min_error: f64,
    pub duration_secs: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_flags_first_layer_as_input() {
        let topo = NetworkTopology::builder()
            .layer(2, Activation::Linear)
            .layer(3, Activation::ReLU)
            .layer(1, Activation::Sigmoid)
            .build()
            .unwrap();
        let flags: Vec<bool> = topo.layers().iter().map(|l| l.is_input).collect();
        assert_eq!(flags, vec![true, false, false]);
        assert_eq!(topo.total_neurons(), 6);
        assert!(topo.is_output(2));
        assert!(!topo.is_output(1));
    }

    #[test]
    fn single_layer_is_input_not_output() {
        let topo = NetworkTopology::builder()
            .layer(3, Activation::Linear)
            .build()
            .unwrap();
        assert!(!topo.is_output(0));
    }

    #[test]
    fn builder_rejects_empty_and_zero_layers() {
        assert!(matches!(
            NetworkTopology::builder().build(),
            Err(ModelError::NoLayers)
        ));
        assert!(matches!(
            NetworkTopology::builder()
                .layer(2, Activation::Linear)
                .layer(0, Activation::Tanh)
                .build(),
            Err(ModelError::EmptyLayer { index: 1 })
        ));
    }

    #[test]
    fn templates_decode() {
        let deep = template("deep").unwrap();
        assert_eq!(deep.layers, vec![4, 16, 8, 4, 1]);
        let rows = deep.rows();
        assert_eq!(rows[0].1, Activation::Linear);
        assert!(rows[1..].iter().all(|(_, a)| *a == Activation::Sigmoid));
        assert!(matches!(
            template("huge"),
            Err(ModelError::UnknownTemplate { .. })
        ));
    }

    #[test]
    fn confusion_matrix_must_be_square() {
        assert!(ConfusionMatrix::new(vec![]).is_err());
        assert!(ConfusionMatrix::new(vec![vec![1, 2], vec![3]]).is_err());
        let m = ConfusionMatrix::new(vec![vec![1, 2], vec![3, 9]]).unwrap();
        assert_eq!(m.max_count(), 9);
        assert_eq!(m.get(1, 0), Some(3));
        assert_eq!(m.get(2, 0), None);
        assert_eq!(m.get(0, 2), None);
    }

    #[test]
    fn demo_matrix_scores() {
        let scores = ConfusionMatrix::demo().scores().unwrap();
        assert!((scores.precision - 47.0 / 50.0).abs() < 1e-12);
        assert!((scores.recall - 47.0 / 52.0).abs() < 1e-12);
        let f1 = 2.0 * scores.precision * scores.recall / (scores.precision + scores.recall);
        assert!((scores.f1 - f1).abs() < 1e-12);
    }

    #[test]
    fn scores_guard_empty_denominators() {
        let none_predicted = ConfusionMatrix::new(vec![vec![10, 4], vec![0, 0]]).unwrap();
        let scores = none_predicted.scores().unwrap();
        assert_eq!(scores.precision, 0.0);
        assert_eq!(scores.recall, 0.0);
        assert_eq!(scores.f1, 0.0);

        let three = ConfusionMatrix::new(vec![vec![1; 3]; 3]).unwrap();
        assert!(three.scores().is_none());
    }

    #[test]
    fn dataset_file_name_is_last_segment() {
        let ds = DatasetDescriptor {
            source: "data/XOR_dataset.csv".into(),
            inputs: 2,
            outputs: 1,
            has_header: true,
            loaded: String::new(),
        };
        assert_eq!(ds.file_name(), "XOR_dataset.csv");
    }
}
