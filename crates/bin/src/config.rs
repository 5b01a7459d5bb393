//! Pipeline configuration.
//!
//! Every stage reads its inputs and writes its output at paths taken from one
//! [`PipelineConfig`], built from a base directory with the conventional
//! `data/raw` and `data/processed` layout.

use clap::{Args, ValueEnum};
use rollover_data::SpotColumn;
use std::path::{Path, PathBuf};

/// Cash-market snapshot handled by the spot stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum Period {
    /// Latest month.
    Current,
    /// Month before the latest.
    Previous,
}

impl Period {
    pub(crate) const fn column(self) -> SpotColumn {
        match self {
            Self::Current => SpotColumn::Current,
            Self::Previous => SpotColumn::Previous,
        }
    }

    pub(crate) const fn label(self) -> &'static str {
        match self {
            Self::Current => "spot-current",
            Self::Previous => "spot-previous",
        }
    }
}

/// Path and behaviour overrides shared by every command.
#[derive(Debug, Clone, Args)]
pub(crate) struct PathArgs {
    /// Base directory holding `data/raw` and `data/processed`
    #[arg(long, global = true, default_value = ".")]
    pub(crate) base: PathBuf,

    /// Futures files for the monthly window
    #[arg(long, global = true)]
    pub(crate) fo_monthly_dir: Option<PathBuf>,

    /// Futures files for the trailing window
    #[arg(long, global = true)]
    pub(crate) fo_trailing_dir: Option<PathBuf>,

    /// Cash-market bhavcopy for the latest month
    #[arg(long, global = true)]
    pub(crate) cm_current_dir: Option<PathBuf>,

    /// Cash-market bhavcopy for the previous month
    #[arg(long, global = true)]
    pub(crate) cm_previous_dir: Option<PathBuf>,

    /// Output directory for all processed tables
    #[arg(long, global = true)]
    pub(crate) processed_dir: Option<PathBuf>,

    /// Monthly metric table
    #[arg(long, global = true)]
    pub(crate) monthly_table: Option<PathBuf>,

    /// Trailing-window metric table
    #[arg(long, global = true)]
    pub(crate) six_month_table: Option<PathBuf>,

    /// Current spot table
    #[arg(long, global = true)]
    pub(crate) spot_current_table: Option<PathBuf>,

    /// Previous spot table
    #[arg(long, global = true)]
    pub(crate) spot_previous_table: Option<PathBuf>,

    /// Reconciled table
    #[arg(long, global = true)]
    pub(crate) reconciled_table: Option<PathBuf>,

    /// Sector layout table
    #[arg(long, global = true)]
    pub(crate) layout_table: Option<PathBuf>,

    /// External SYMBOL,SECTOR table replacing the built-in sectors
    #[arg(long, global = true)]
    pub(crate) sector_file: Option<PathBuf>,

    /// Trailing window length in calendar months
    #[arg(long, global = true, default_value = "6")]
    pub(crate) months: u32,

    /// Leave PREV_SPOT_CLOSE empty instead of reading the previous spot table
    #[arg(long, global = true)]
    pub(crate) skip_previous: bool,
}

/// Resolved locations and options for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PipelineConfig {
    pub(crate) fo_monthly_dir: PathBuf,
    pub(crate) fo_trailing_dir: PathBuf,
    pub(crate) cm_current_dir: PathBuf,
    pub(crate) cm_previous_dir: PathBuf,
    pub(crate) monthly_table: PathBuf,
    pub(crate) six_month_table: PathBuf,
    pub(crate) spot_current_table: PathBuf,
    pub(crate) spot_previous_table: PathBuf,
    pub(crate) reconciled_table: PathBuf,
    pub(crate) layout_table: PathBuf,
    pub(crate) sector_file: Option<PathBuf>,
    pub(crate) trailing_months: u32,
    pub(crate) include_previous: bool,
}

impl PipelineConfig {
    /// Conventional layout under `base`.
    pub(crate) fn from_base(base: &Path) -> Self {
        let raw = base.join("data").join("raw");
        let processed = base.join("data").join("processed");
        let mut config = Self {
            fo_monthly_dir: raw.join("fo_latest_month"),
            fo_trailing_dir: raw.join("fo_last_sixmonth"),
            cm_current_dir: raw.join("cm_latest_month"),
            cm_previous_dir: raw.join("cm_previous_month"),
            monthly_table: PathBuf::new(),
            six_month_table: PathBuf::new(),
            spot_current_table: PathBuf::new(),
            spot_previous_table: PathBuf::new(),
            reconciled_table: PathBuf::new(),
            layout_table: PathBuf::new(),
            sector_file: None,
            trailing_months: 6,
            include_previous: true,
        };
        config.set_processed_dir(&processed);
        config
    }

    /// Point every output table at `processed`, keeping the per-stage subdirectories.
    fn set_processed_dir(&mut self, processed: &Path) {
        self.monthly_table = processed
            .join("latest_month_avg")
            .join("monthly_rollover_standard.csv");
        self.six_month_table = processed
            .join("last_sixmonth_avg")
            .join("six_month_rollover_standard.csv");
        self.spot_current_table = processed
            .join("latest_month_cm")
            .join("eq_spot_standard.csv");
        self.spot_previous_table = processed
            .join("previous_month_cm")
            .join("eq_spot_previous_standard.csv");
        self.reconciled_table = processed
            .join("merged")
            .join("final_fo_oi_rollover_standard.csv");
        self.layout_table = processed
            .join("merged")
            .join("final_fo_sector_excel_layout.csv");
    }

    /// Conventional layout with command-line overrides applied.
    pub(crate) fn from_args(args: &PathArgs) -> Self {
        let mut config = Self::from_base(&args.base);
        if let Some(dir) = &args.fo_monthly_dir {
            config.fo_monthly_dir.clone_from(dir);
        }
        if let Some(dir) = &args.fo_trailing_dir {
            config.fo_trailing_dir.clone_from(dir);
        }
        if let Some(dir) = &args.cm_current_dir {
            config.cm_current_dir.clone_from(dir);
        }
        if let Some(dir) = &args.cm_previous_dir {
            config.cm_previous_dir.clone_from(dir);
        }
        if let Some(dir) = &args.processed_dir {
            config.set_processed_dir(dir);
        }
        for (target, value) in [
            (&mut config.monthly_table, &args.monthly_table),
            (&mut config.six_month_table, &args.six_month_table),
            (&mut config.spot_current_table, &args.spot_current_table),
            (&mut config.spot_previous_table, &args.spot_previous_table),
            (&mut config.reconciled_table, &args.reconciled_table),
            (&mut config.layout_table, &args.layout_table),
        ] {
            if let Some(path) = value {
                target.clone_from(path);
            }
        }
        config.sector_file.clone_from(&args.sector_file);
        config.trailing_months = args.months;
        config.include_previous = !args.skip_previous;
        config
    }

    /// Directory holding the cash-market file for `period`.
    pub(crate) fn cash_market_dir(&self, period: Period) -> &Path {
        match period {
            Period::Current => &self.cm_current_dir,
            Period::Previous => &self.cm_previous_dir,
        }
    }

    /// Spot table written for `period`.
    pub(crate) fn spot_table(&self, period: Period) -> &Path {
        match period {
            Period::Current => &self.spot_current_table,
            Period::Previous => &self.spot_previous_table,
        }
    }
}
