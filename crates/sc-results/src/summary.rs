//! End-of-run summary aggregation.

use serde::{Deserialize, Serialize};

use crate::conversion::VolumeConversion;
use crate::metrics::{MetricDef, MetricSource};
use crate::{ResultsError, ResultsResult};

/// Cumulative counters a finished run exposes. Volumes in ft³.
pub trait SummarySource {
    fn contains_node(&self, node: &str) -> bool;
    fn cumulative_inflow(&self, node: &str) -> f64;
    fn system_flooding(&self) -> f64;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryEntry {
    pub name: String,
    pub value: f64,
}

/// Metric name to volume, in definition order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunSummary {
    entries: Vec<SummaryEntry>,
}

impl RunSummary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a metric. New names go to the end.
    pub fn insert(&mut self, name: impl Into<String>, value: f64) {
        let name = name.into();
        match self.entries.iter_mut().find(|e| e.name == name) {
            Some(entry) => entry.value = value,
            None => self.entries.push(SummaryEntry { name, value }),
        }
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .map(|e| e.value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|e| (e.name.as_str(), e.value))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Read every metric from `source`.
///
/// All node names are checked before any value is read.
///
/// # Errors
///
/// [`ResultsError::UnknownHandle`] for the first metric naming a node the
/// source does not know.
pub fn summarize(
    defs: &[MetricDef],
    source: &dyn SummarySource,
    conversion: VolumeConversion,
) -> ResultsResult<RunSummary> {
    if let Some(def) = defs
        .iter()
        .find(|d| d.node().is_some_and(|n| !source.contains_node(n)))
    {
        return Err(ResultsError::UnknownHandle {
            metric: def.name.clone(),
            name: def.node().unwrap_or_default().to_string(),
        });
    }

    let mut summary = RunSummary::new();
    for def in defs {
        let raw = match &def.source {
            MetricSource::NodeCumulativeInflow { node } => source.cumulative_inflow(node),
            MetricSource::SystemFlooding => source.system_flooding(),
        };
        summary.insert(def.name.clone(), conversion.apply(raw) * def.scale);
    }
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::default_summary_def;
    use std::collections::HashMap;

    struct Totals {
        inflow: HashMap<&'static str, f64>,
        flooding: f64,
    }

    impl SummarySource for Totals {
        fn contains_node(&self, node: &str) -> bool {
            self.inflow.contains_key(node)
        }

        fn cumulative_inflow(&self, node: &str) -> f64 {
            self.inflow[node]
        }

        fn system_flooding(&self) -> f64 {
            self.flooding
        }
    }

    fn hartfordville() -> Totals {
        Totals {
            inflow: HashMap::from([
                ("CSO3", 1.0e6),
                ("CSO4", 2.0e6),
                ("CSO9", 0.0),
                ("WESTRIVER_TP", 5.0e6),
                ("WESTRIVER_GRAVITY_BYPASS", 0.5e6),
                ("EASTRIVER_TP", 4.0e6),
                ("EASTRIVER_GRAVITY_BYPASS", 0.0),
            ]),
            flooding: 10_000.0,
        }
    }

    #[test]
    fn summarizes_in_definition_order() {
        let summary = summarize(
            &default_summary_def(),
            &hartfordville(),
            VolumeConversion::default(),
        )
        .unwrap();

        assert_eq!(summary.len(), 8);
        assert_eq!(summary.names().next(), Some("CSO3"));
        assert!((summary.get("CSO3").unwrap() - 7.481).abs() < 1e-9);
        assert!((summary.get("WESTRIVER_TP").unwrap() - 37.405).abs() < 1e-9);
        // 10 000 ft³ -> 0.07481 MG -> 74.81 KGal
        assert!((summary.get("FLOODING_VOLUME (KGal)").unwrap() - 74.81).abs() < 1e-9);
    }

    #[test]
    fn unknown_node_fails_before_reading() {
        let mut totals = hartfordville();
        totals.inflow.remove("CSO9");
        let err = summarize(&default_summary_def(), &totals, VolumeConversion::default())
            .unwrap_err();
        match err {
            ResultsError::UnknownHandle { metric, name } => {
                assert_eq!(metric, "CSO9");
                assert_eq!(name, "CSO9");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn insert_replaces_in_place() {
        let mut s = RunSummary::new();
        s.insert("a", 1.0);
        s.insert("b", 2.0);
        s.insert("a", 3.0);
        assert_eq!(s.iter().collect::<Vec<_>>(), vec![("a", 3.0), ("b", 2.0)]);
    }

    #[test]
    fn serializes_as_entry_list() {
        let mut s = RunSummary::new();
        s.insert("CSO3", 0.25);
        let json = serde_json::to_string(&s).unwrap();
        assert_eq!(json, r#"[{"name":"CSO3","value":0.25}]"#);
        let back: RunSummary = serde_json::from_str(&json).unwrap();
        assert_eq!(back, s);
    }
}
