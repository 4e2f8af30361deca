//! Side-by-side comparison of an uncontrolled and a controlled run.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::summary::RunSummary;
use crate::{ResultsError, ResultsResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRow {
    pub name: String,
    pub uncontrolled: f64,
    pub controlled: f64,
}

impl ComparisonRow {
    /// Controlled minus uncontrolled; negative means the controls reduced it.
    pub fn change(&self) -> f64 {
        self.controlled - self.uncontrolled
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    pub rows: Vec<ComparisonRow>,
}

impl Comparison {
    /// Pair two summaries metric by metric.
    ///
    /// # Errors
    ///
    /// [`ResultsError::MetricMismatch`] unless both summaries list the same
    /// metrics in the same order.
    pub fn new(uncontrolled: &RunSummary, controlled: &RunSummary) -> ResultsResult<Self> {
        if uncontrolled.len() != controlled.len() {
            return Err(ResultsError::MetricMismatch {
                message: format!(
                    "{} metrics without control, {} with control",
                    uncontrolled.len(),
                    controlled.len()
                ),
            });
        }

        let rows = uncontrolled
            .iter()
            .zip(controlled.iter())
            .map(|((a_name, a), (b_name, b))| {
                if a_name != b_name {
                    return Err(ResultsError::MetricMismatch {
                        message: format!("'{a_name}' paired with '{b_name}'"),
                    });
                }
                Ok(ComparisonRow {
                    name: a_name.to_string(),
                    uncontrolled: a,
                    controlled: b,
                })
            })
            .collect::<ResultsResult<Vec<_>>>()?;

        Ok(Self { rows })
    }

    pub fn row(&self, name: &str) -> Option<&ComparisonRow> {
        self.rows.iter().find(|r| r.name == name)
    }

    /// Fixed-width console table.
    pub fn render_table(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "|{:27}|{:15}|{:15}|",
            " Volume Type  ", " No Control (MG) ", " W Control (MG)  "
        )?;
        writeln!(f, "|---------------------------|-----------------|-----------------|")?;
        for row in &self.rows {
            writeln!(
                f,
                "| {:25} | {:15.3} | {:15.3} |",
                row.name, row.uncontrolled, row.controlled
            )?;
        }
        Ok(())
    }
}
