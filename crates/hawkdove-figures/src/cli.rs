//! Command-line arguments.

use std::path::PathBuf;

use clap::Parser;

use crate::catalog::FigureKind;

/// Generate figures and tables from hawk-dove innovation simulation output.
#[derive(Debug, Parser)]
#[command(name = "hawkdove-figures", version, about)]
pub struct Args {
    /// Config file (YAML or TOML). Defaults to `hawkdove-figures.yaml` in
    /// the working directory when it exists.
    #[arg(long, env = "HAWKDOVE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Figure to generate; repeat for several. All figures when omitted.
    #[arg(long = "figure", value_enum)]
    pub figures: Vec<FigureKind>,

    /// Print the available figures and exit.
    #[arg(long)]
    pub list: bool,

    /// Run the selected figures on a thread pool.
    #[arg(long)]
    pub parallel: bool,
}

impl Args {
    /// The figures to run, in default order and without repeats.
    pub fn selected(&self) -> Vec<FigureKind> {
        if self.figures.is_empty() {
            return FigureKind::ALL.to_vec();
        }
        let mut kinds = self.figures.clone();
        kinds.sort_unstable();
        kinds.dedup();
        kinds
    }
}
