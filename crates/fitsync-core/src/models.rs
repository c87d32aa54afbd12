//! Typed shapes of the Google Fit and Habitica payloads fitsync reads.
//!
//! Only the fields a run needs are modelled; unknown fields are ignored.
//! A missing required field fails decoding, which the clients surface as
//! `ApiError::MalformedResponse`.

use serde::{Deserialize, Serialize};

/// Google Fit dataset response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PointSeries {
    pub point: Vec<StepPoint>,
}

/// One data point; step deltas carry a single value but the format allows more.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StepPoint {
    pub value: Vec<PointValue>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointValue {
    #[serde(rename = "intVal")]
    pub int_val: i64,
}

impl PointSeries {
    /// Series with one point per slice, each value becoming an `intVal`.
    pub fn from_values(points: &[&[i64]]) -> Self {
        Self {
            point: points
                .iter()
                .map(|values| StepPoint {
                    value: values.iter().map(|&int_val| PointValue { int_val }).collect(),
                })
                .collect(),
        }
    }
}

/// A Habitica task. `text` is the user-facing name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub text: String,
}

impl Task {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
        }
    }
}
