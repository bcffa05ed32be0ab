use itertools::Itertools;
use serde::Serialize;

use crate::{config::BaselineNames, data::UnifiedTable, error::ReportError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AxisSet {
    pub sizes: Vec<u64>,
    pub experiments: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NameSet {
    pub baseline: Vec<String>,
    pub comparison: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Keys {
    pub axes: AxisSet,
    pub names: NameSet,
}

impl Keys {
    /// Distinct sizes, experiments and variant names, each in first-seen order
    pub fn extract(table: &UnifiedTable, baselines: &BaselineNames) -> Result<Self, ReportError> {
        if table.is_empty() {
            return Err(ReportError::EmptyDataset("no rows loaded".to_owned()));
        }
        let rows = table.rows();

        let sizes = rows.iter().map(|r| r.size).unique().collect::<Vec<_>>();
        let experiments = rows
            .iter()
            .map(|r| r.experiment.clone())
            .unique()
            .collect::<Vec<_>>();
        if experiments.iter().all(|e| e.is_empty()) {
            return Err(ReportError::EmptyDataset("no experiment labels".to_owned()));
        }

        for baseline in baselines.all() {
            if !rows.iter().any(|r| r.name == baseline) {
                return Err(ReportError::EmptyDataset(format!(
                    "no rows for baseline '{baseline}'"
                )));
            }
        }

        let comparison = rows
            .iter()
            .map(|r| r.name.as_str())
            .filter(|name| !baselines.contains(name))
            .unique()
            .map(str::to_owned)
            .collect::<Vec<_>>();

        Ok(Self {
            axes: AxisSet { sizes, experiments },
            names: NameSet {
                baseline: baselines.all().map(str::to_owned).to_vec(),
                comparison,
            },
        })
    }
}
