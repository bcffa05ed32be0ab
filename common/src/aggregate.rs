use tracing::debug;

use crate::{
    data::{ResultRow, UnifiedTable},
    error::ReportError,
};

/// Reductions of `no_warmup_avg` over the unified table.
///
/// Baselines are strict: a reference value must exist. Comparison series are
/// sparse across experiments, so a gap contributes zero.
pub struct Aggregator<'a> {
    table: &'a UnifiedTable,
    sizes: &'a [u64],
}

impl<'a> Aggregator<'a> {
    pub fn new(table: &'a UnifiedTable, sizes: &'a [u64]) -> Self {
        Self { table, sizes }
    }

    fn matching<'r>(
        &'r self,
        source_file: &'r str,
        name: &'r str,
    ) -> impl Iterator<Item = &'a ResultRow> + 'r {
        self.table
            .rows()
            .iter()
            .filter(move |r| r.source_file == source_file && r.name == name)
    }

    pub fn baseline_value(
        &self,
        source_file: &str,
        name: &str,
        size: u64,
    ) -> Result<f64, ReportError> {
        let values = self
            .matching(source_file, name)
            .filter(|r| r.size == size)
            .map(|r| r.no_warmup_avg)
            .collect::<Vec<_>>();
        if values.is_empty() {
            return Err(ReportError::NoMatch {
                file: source_file.to_owned(),
                name: name.to_owned(),
                size,
            });
        }
        Ok(sum_matches(&values, source_file, name, size))
    }

    /// Baseline for one experiment. Falls back to [`Aggregator::baseline_value`]
    /// over every experiment when `experiment` has no row at this size.
    pub fn experiment_baseline(
        &self,
        source_file: &str,
        name: &str,
        experiment: &str,
        size: u64,
    ) -> Result<f64, ReportError> {
        let values = self
            .matching(source_file, name)
            .filter(|r| r.experiment == experiment && r.size == size)
            .map(|r| r.no_warmup_avg)
            .collect::<Vec<_>>();
        if values.is_empty() {
            debug!("No '{experiment}' row for baseline ({source_file}, {name}, {size})");
            return self.baseline_value(source_file, name, size);
        }
        Ok(sum_matches(&values, source_file, name, size))
    }

    /// One entry per size, in axis order
    pub fn comparison_series(&self, source_file: &str, name: &str, experiment: &str) -> Vec<f64> {
        self.sizes
            .iter()
            .map(|size| {
                self.matching(source_file, name)
                    .filter(|r| r.experiment == experiment && r.size == *size)
                    .fold(0.0, |acc, r| acc + r.no_warmup_avg)
            })
            .collect()
    }
}

fn sum_matches(values: &[f64], source_file: &str, name: &str, size: u64) -> f64 {
    if values.len() > 1 {
        debug!(
            "{} rows for baseline ({source_file}, {name}, {size}), summing",
            values.len()
        );
    }
    values.iter().fold(0.0, |acc, v| acc + v)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::InputFile;
    use crate::data::{read_rows, tests::row};

    fn table() -> UnifiedTable {
        UnifiedTable::new(vec![
            row("a", "e1", "io", 10, 5.0),
            row("a", "e1", "io", 100, 50.0),
            row("a", "e1", "impl_a", 10, 7.0),
            row("a", "e1", "impl_a", 10, 1.0),
            row("a", "e2", "impl_a", 100, 3.0),
            row("b", "e1", "io", 10, 6.0),
            row("b", "e2", "io", 10, 4.0),
        ])
    }

    #[test]
    fn baseline_takes_the_single_match() {
        let table = table();
        let sizes = [10, 100];
        let agg = Aggregator::new(&table, &sizes);
        assert_eq!(agg.baseline_value("a", "io", 10).unwrap(), 5.0);
        assert_eq!(agg.baseline_value("a", "io", 100).unwrap(), 50.0);
    }

    #[test]
    fn baseline_sums_multiple_matches() {
        let table = table();
        let sizes = [10, 100];
        let agg = Aggregator::new(&table, &sizes);
        assert_eq!(agg.baseline_value("b", "io", 10).unwrap(), 10.0);
    }

    #[test]
    fn missing_baseline_is_an_error_not_zero() {
        let table = table();
        let sizes = [10, 100];
        let agg = Aggregator::new(&table, &sizes);
        match agg.baseline_value("b", "io", 100).unwrap_err() {
            ReportError::NoMatch { file, name, size } => {
                assert_eq!((file.as_str(), name.as_str(), size), ("b", "io", 100));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn comparison_series_has_one_entry_per_size() {
        let table = table();
        let sizes = [10, 100, 1000];
        let agg = Aggregator::new(&table, &sizes);
        assert_eq!(agg.comparison_series("a", "impl_a", "e1"), [8.0, 0.0, 0.0]);
        assert_eq!(agg.comparison_series("a", "impl_a", "e2"), [0.0, 3.0, 0.0]);
        assert_eq!(agg.comparison_series("b", "impl_a", "e1"), [0.0, 0.0, 0.0]);
    }

    #[test]
    fn experiment_baseline_prefers_its_own_rows() {
        let table = table();
        let sizes = [10, 100];
        let agg = Aggregator::new(&table, &sizes);
        assert_eq!(agg.experiment_baseline("b", "io", "e1", 10).unwrap(), 6.0);
        assert_eq!(agg.experiment_baseline("b", "io", "e2", 10).unwrap(), 4.0);
        // e3 has no io rows in b, every experiment counts
        assert_eq!(agg.experiment_baseline("b", "io", "e3", 10).unwrap(), 10.0);
        assert!(matches!(
            agg.experiment_baseline("b", "io", "e1", 100),
            Err(ReportError::NoMatch { size: 100, .. })
        ));
    }

    #[test]
    fn single_row_csv_round_trip() {
        let data = "timestamp,experiment,name,size,amount,warmup,duration,amount_avg,no_warmup_avg\n\
                    0,e1,io,10,1,0,1,1,5.0\n";
        let table = read_rows(data.as_bytes(), &InputFile::new("file", "label")).unwrap();
        let sizes = [10];
        let agg = Aggregator::new(&table, &sizes);
        assert_eq!(agg.baseline_value("file", "io", 10).unwrap(), 5.0);
    }
}
