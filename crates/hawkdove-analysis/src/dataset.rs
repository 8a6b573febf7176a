//! Condition-keyed series collections.
//!
//! A [`ComparisonDataset`] is what every study hands to a renderer: an
//! ordered map from [`ConditionKey`] to the series drawn for that condition,
//! plus optional summary series such as a general trend. It serialises to
//! JSON so a figure's underlying numbers ship alongside the image.

use std::collections::BTreeMap;

use hawkdove_types::ConditionKey;
use serde::Serialize;

/// A labelled sequence of `(x, y)` points.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    /// Legend text.
    pub label: String,
    /// Points in drawing order.
    pub points: Vec<(f64, f64)>,
}

impl Series {
    /// Create a series.
    pub fn new(label: impl Into<String>, points: Vec<(f64, f64)>) -> Self {
        Self {
            label: label.into(),
            points,
        }
    }

    /// Pair `ys` with `xs` positionally; the shorter side wins.
    pub fn from_xy(label: impl Into<String>, xs: &[f64], ys: &[f64]) -> Self {
        Self::new(label, xs.iter().copied().zip(ys.iter().copied()).collect())
    }

    /// The y values.
    pub fn ys(&self) -> Vec<f64> {
        self.points.iter().map(|(_, y)| *y).collect()
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the series has no points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Series grouped by condition, in [`ConditionKey`] order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComparisonDataset {
    title: String,
    entries: BTreeMap<ConditionKey, Vec<Series>>,
    summary: Vec<Series>,
}

#[derive(Serialize)]
struct DatasetDocument<'a> {
    title: &'a str,
    conditions: Vec<ConditionDocument<'a>>,
    #[serde(skip_serializing_if = "<[Series]>::is_empty")]
    summary: &'a [Series],
}

#[derive(Serialize)]
struct ConditionDocument<'a> {
    condition: &'a ConditionKey,
    label: String,
    series: &'a [Series],
}

impl ComparisonDataset {
    /// Create an empty dataset.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Title shown on the figure.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Append a series under `condition`.
    pub fn insert(&mut self, condition: ConditionKey, series: Series) {
        self.entries.entry(condition).or_default().push(series);
    }

    /// Append a summary series.
    pub fn push_summary(&mut self, series: Series) {
        self.summary.push(series);
    }

    /// Conditions and their series in order.
    pub fn entries(&self) -> impl Iterator<Item = (&ConditionKey, &[Series])> {
        self.entries.iter().map(|(k, v)| (k, v.as_slice()))
    }

    /// Every series, conditions first, then summaries.
    pub fn all_series(&self) -> impl Iterator<Item = &Series> {
        self.entries.values().flatten().chain(self.summary.iter())
    }

    /// Series of one condition.
    pub fn get(&self, condition: &ConditionKey) -> Option<&[Series]> {
        self.entries.get(condition).map(Vec::as_slice)
    }

    /// Summary series.
    pub fn summary(&self) -> &[Series] {
        &self.summary
    }

    /// Number of conditions.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no condition has been inserted.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Pretty-printed JSON document of the dataset.
    ///
    /// # Errors
    ///
    /// Only if a value cannot be represented, which `serde_json` reports
    /// for non-string map keys; none occur here.
    pub fn to_json(&self) -> serde_json::Result<String> {
        let document = DatasetDocument {
            title: &self.title,
            conditions: self
                .entries
                .iter()
                .map(|(condition, series)| ConditionDocument {
                    condition,
                    label: condition.to_string(),
                    series,
                })
                .collect(),
            summary: &self.summary,
        };
        serde_json::to_string_pretty(&document)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use hawkdove_types::PowerAsymmetry;

    use super::*;

    #[test]
    fn entries_follow_condition_order() {
        let mut dataset = ComparisonDataset::new("Fox usage");
        let f = PowerAsymmetry::from_milli(0);
        dataset.insert(
            ConditionKey::for_population(200, f).without_power(),
            Series::new("N = 200", vec![(0.0, 0.1)]),
        );
        dataset.insert(
            ConditionKey::for_population(20, f).without_power(),
            Series::new("N = 20", vec![(0.0, 0.3)]),
        );
        let labels: Vec<&str> = dataset
            .entries()
            .flat_map(|(_, s)| s.iter().map(|s| s.label.as_str()))
            .collect();
        assert_eq!(labels, vec!["N = 20", "N = 200"]);
        assert_eq!(dataset.len(), 2);
    }

    #[test]
    fn json_lists_conditions_and_summary() {
        let mut dataset = ComparisonDataset::new("Fox usage");
        let key = ConditionKey::for_population(20, PowerAsymmetry::from_milli(0)).without_power();
        dataset.insert(key, Series::from_xy("N = 20", &[0.0, 0.1], &[0.5, 0.25]));
        dataset.push_summary(Series::new("General Trend", vec![(0.0, 0.5)]));

        let json: serde_json::Value = serde_json::from_str(&dataset.to_json().unwrap()).unwrap();
        assert_eq!(json["title"], "Fox usage");
        assert_eq!(json["conditions"][0]["label"], "population=20");
        assert_eq!(json["conditions"][0]["condition"]["population"], 20);
        assert_eq!(json["conditions"][0]["series"][0]["points"][1][1], 0.25);
        assert_eq!(json["summary"][0]["label"], "General Trend");
        assert_eq!(dataset.all_series().count(), 2);
    }
}
