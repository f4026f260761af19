//! Form values and their fallbacks.
//!
//! Every numeric field falls back to a documented constant when it is empty,
//! unparsable or zero, so user input never fails an action.

use std::str::FromStr;

pub const DEFAULT_LEARNING_RATE: f64 = 0.1;
pub const DEFAULT_EPOCHS: u32 = 100;
pub const DEFAULT_BATCH_SIZE: u32 = 32;
pub const DEFAULT_MOMENTUM: f64 = 0.9;
pub const DEFAULT_NEURONS: usize = 2;
pub const DEFAULT_INPUTS: usize = 2;
pub const DEFAULT_OUTPUTS: usize = 1;

#[derive(Debug, Clone, PartialEq)]
pub struct TrainingParams {
    pub learning_rate: f64,
    pub epochs: u32,
    pub batch_size: u32,
    pub momentum: f64,
    pub shuffle: bool,
}

impl Default for TrainingParams {
    fn default() -> Self {
        Self {
            learning_rate: DEFAULT_LEARNING_RATE,
            epochs: DEFAULT_EPOCHS,
            batch_size: DEFAULT_BATCH_SIZE,
            momentum: DEFAULT_MOMENTUM,
            shuffle: true,
        }
    }
}

/// Raw text of the training parameters dialog.
#[derive(Debug, Clone)]
pub struct TrainingForm {
    pub learning_rate: String,
    pub epochs: String,
    pub batch_size: String,
    pub momentum: String,
    pub shuffle: bool,
}

impl Default for TrainingForm {
    fn default() -> Self {
        let p = TrainingParams::default();
        Self {
            learning_rate: p.learning_rate.to_string(),
            epochs: p.epochs.to_string(),
            batch_size: p.batch_size.to_string(),
            momentum: p.momentum.to_string(),
            shuffle: p.shuffle,
        }
    }
}

impl TrainingForm {
    pub fn parse(&self) -> TrainingParams {
        TrainingParams {
            learning_rate: parse_or(&self.learning_rate, DEFAULT_LEARNING_RATE),
            epochs: parse_or(&self.epochs, DEFAULT_EPOCHS),
            batch_size: parse_or(&self.batch_size, DEFAULT_BATCH_SIZE),
            momentum: parse_or(&self.momentum, DEFAULT_MOMENTUM),
            shuffle: self.shuffle,
        }
    }
}

/// Parses `text`, falling back on anything empty, malformed or zero.
pub fn parse_or<T>(text: &str, fallback: T) -> T
where
    T: FromStr + PartialEq + Default,
{
    match text.trim().parse::<T>() {
        Ok(v) if v != T::default() => v,
        _ => fallback,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_and_garbage_fields_fall_back() {
        let form = TrainingForm {
            learning_rate: "".into(),
            epochs: "abc".into(),
            batch_size: "0".into(),
            momentum: " 0.5 ".into(),
            shuffle: false,
        };
        let p = form.parse();
        assert_eq!(p.learning_rate, DEFAULT_LEARNING_RATE);
        assert_eq!(p.epochs, DEFAULT_EPOCHS);
        assert_eq!(p.batch_size, DEFAULT_BATCH_SIZE);
        assert_eq!(p.momentum, 0.5);
        assert!(!p.shuffle);
    }

    #[test]
    fn default_form_round_trips_to_default_params() {
        assert_eq!(TrainingForm::default().parse(), TrainingParams::default());
    }

    #[test]
    fn neuron_field_rejects_negative() {
        assert_eq!(parse_or::<usize>("-3", DEFAULT_NEURONS), DEFAULT_NEURONS);
        assert_eq!(parse_or::<usize>("7", DEFAULT_NEURONS), 7);
    }
}
