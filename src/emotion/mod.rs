//! Emotion confidence vectors as returned by the chat service and the
//! normalization used before they are displayed.
//!
//! The service attaches a label to confidence map to each assistant
//! reply. The map doesn't say which scale it uses: depending on the
//! classifier the values are either in `[0, 1]` or in `[0, 100]`.
//! `normalize` guesses the scale for the whole vector, clamps every
//! value into `[0, 1]` and sorts the result so the dominant emotion
//! comes first.
use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

pub mod display;

/// Any raw value above this means the vector is on the 0-100 scale.
const PERCENT_SCALE_THRESHOLD: f64 = 1.0001;

/// Bounds outside of which the normalized values clearly don't form
/// a distribution and the reader should be told so.
const TOTAL_LOWER_BOUND: f64 = 0.95;
const TOTAL_UPPER_BOUND: f64 = 1.05;

/// Raw emotion scores keyed by label, in the order the service sent
/// them. Insertion order matters because it breaks ties when sorting.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EmotionVector(Vec<(String, f64)>);

impl EmotionVector {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Sets the score for `label`, keeping the original position if
    /// the label is already present.
    pub fn insert(&mut self, label: &str, score: f64) {
        if let Some(entry) = self.0.iter_mut().find(|(l, _)| l == label) {
            entry.1 = score;
        } else {
            self.0.push((label.to_string(), score));
        }
    }

    pub fn get(&self, label: &str) -> Option<f64> {
        self.0.iter().find(|(l, _)| l == label).map(|(_, v)| *v)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, (String, f64)> {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> FromIterator<(&'a str, f64)> for EmotionVector {
    fn from_iter<I: IntoIterator<Item = (&'a str, f64)>>(iter: I) -> Self {
        let mut vector = EmotionVector::new();
        for (label, score) in iter {
            vector.insert(label, score);
        }
        vector
    }
}

// Loose numeric conversion. Anything that doesn't read as a finite
// number counts as zero confidence.
fn coerce_score(value: &Value) -> f64 {
    let score = match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                0.0
            } else {
                trimmed.parse::<f64>().unwrap_or(0.0)
            }
        }
        Value::Bool(true) => 1.0,
        _ => 0.0,
    };
    if score.is_finite() { score } else { 0.0 }
}

struct EmotionVectorVisitor;

impl<'de> Visitor<'de> for EmotionVectorVisitor {
    type Value = EmotionVector;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a map of emotion labels to scores")
    }

    fn visit_map<M>(self, mut access: M) -> Result<Self::Value, M::Error>
    where
        M: MapAccess<'de>,
    {
        let mut vector = EmotionVector::new();
        while let Some((label, value)) = access.next_entry::<String, Value>()? {
            vector.insert(&label, coerce_score(&value));
        }
        Ok(vector)
    }

    // `null` is treated the same as an empty vector
    fn visit_unit<E>(self) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Ok(EmotionVector::new())
    }
}

impl<'de> Deserialize<'de> for EmotionVector {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(EmotionVectorVisitor)
    }
}

/// The scale a raw vector was detected to be on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Scale {
    /// Values are already confidences in `[0, 1]`
    Unit,
    /// Values are percentages and were divided by 100
    Percent,
}

#[derive(Clone, Debug, PartialEq)]
pub struct EmotionScore {
    pub label: String,
    pub value: f64,
}

/// Output of `normalize`: entries sorted by value descending, each
/// in `[0, 1]`, along with the scale that was detected.
#[derive(Clone, Debug, PartialEq)]
pub struct Normalized {
    pub scale: Scale,
    pub entries: Vec<EmotionScore>,
}

impl Normalized {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The dominant emotion, if there is any data at all.
    pub fn top(&self) -> Option<&EmotionScore> {
        self.entries.first()
    }

    pub fn sum(&self) -> f64 {
        self.entries.iter().map(|e| e.value).sum()
    }

    /// Values are independent model confidences rather than a
    /// probability distribution so they won't always add up to 100%.
    /// Returns true when the total is far enough off that the reader
    /// should be told.
    pub fn needs_total_advisory(&self) -> bool {
        if self.is_empty() {
            return false;
        }
        let sum = self.sum();
        !(TOTAL_LOWER_BOUND..=TOTAL_UPPER_BOUND).contains(&sum)
    }

    pub fn labels(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.label.as_str()).collect()
    }
}

/// Detect the scale of `raw`, bring every value into `[0, 1]` and
/// sort descending (stable, so equal values keep their original
/// order).
///
/// Scale detection is a heuristic over the whole vector: one value
/// above `1.0001` puts every value on the 0-100 scale. A vector that
/// mixes both scales, e.g. `{joy: 0.9, anger: 90}`, is treated as a
/// percentage vector as a whole so `joy` ends up at `0.009`.
pub fn normalize(raw: Option<&EmotionVector>) -> Normalized {
    let Some(raw) = raw else {
        return Normalized {
            scale: Scale::Unit,
            entries: Vec::new(),
        };
    };

    let scale = if raw.iter().any(|(_, v)| *v > PERCENT_SCALE_THRESHOLD) {
        Scale::Percent
    } else {
        Scale::Unit
    };

    let mut entries: Vec<EmotionScore> = raw
        .iter()
        .map(|(label, v)| {
            let scaled = match scale {
                Scale::Percent => v / 100.0,
                Scale::Unit => *v,
            };
            // Adding zero turns -0.0 into 0.0 so it ties with 0.0
            EmotionScore {
                label: label.clone(),
                value: scaled.clamp(0.0, 1.0) + 0.0,
            }
        })
        .collect();

    // `sort_by` is stable and every value is finite after clamping
    entries.sort_by(|a, b| b.value.total_cmp(&a.value));

    Normalized { scale, entries }
}
