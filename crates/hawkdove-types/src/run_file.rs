//! Simulation output file names.
//!
//! Two naming forms are in circulation:
//!
//! - indexed: `StrategyVisit_0.csv`, one directory per condition;
//! - keyed: `HDInnov_StrategyVisit_2A441A0Y_1_7.csv`, a flat directory where
//!   a random run key identifies the condition and trailing parameters
//!   record the simulation build.
//!
//! Both are `[<prefix>]<Metric>_<run>[_<param>...].csv`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::metric::Metric;

/// File extension of every simulation output table.
const EXTENSION: &str = ".csv";

/// A simulation output file name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunFile {
    /// Text before the metric stem, including its trailing underscore.
    pub prefix: String,
    /// Which table this is.
    pub metric: Metric,
    /// Run index (`0`) or run key (`2A441A0Y`).
    pub run: String,
    /// Trailing parameter tokens.
    pub params: Vec<String>,
}

impl RunFile {
    /// Indexed form: `<Metric>_<run>.csv`.
    pub fn indexed(metric: Metric, run: u32) -> Self {
        Self {
            prefix: String::new(),
            metric,
            run: run.to_string(),
            params: Vec::new(),
        }
    }

    /// Keyed form: `<prefix><Metric>_<key>_<params>.csv`.
    pub fn keyed(prefix: &str, metric: Metric, key: &str, params: &[String]) -> Self {
        Self {
            prefix: prefix.to_owned(),
            metric,
            run: key.to_owned(),
            params: params.to_vec(),
        }
    }

    /// Render back to a file name.
    pub fn file_name(&self) -> String {
        let mut name = format!("{}{}_{}", self.prefix, self.metric.file_stem(), self.run);
        for param in &self.params {
            name.push('_');
            name.push_str(param);
        }
        name.push_str(EXTENSION);
        name
    }
}

impl fmt::Display for RunFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.file_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indexed_name() {
        let file = RunFile::indexed(Metric::StrategyVisit, 0);
        assert_eq!(file.file_name(), "StrategyVisit_0.csv");
        assert_eq!(RunFile::indexed(Metric::NetStd, 3).to_string(), "NetSTD_3.csv");
    }

    #[test]
    fn keyed_name() {
        let params = vec!["1".to_owned(), "7".to_owned()];
        let file = RunFile::keyed("HDInnov_", Metric::FoxUsage, "2A441A0Y", &params);
        assert_eq!(file.to_string(), "HDInnov_FoxUsage_2A441A0Y_1_7.csv");
    }
}
