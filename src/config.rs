use std::env;
use std::path::PathBuf;

/// Published file name of the FY25 SAFMR release.
pub const DEFAULT_DATASET: &str = "FY25_FMRs_revised.xlsx";
pub const DEFAULT_PAGE_SIZE: usize = 10;

// ---------------------------------------------------------------------------
// Application configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Spreadsheet (or csv/parquet/json export) holding the rent table.
    pub dataset_path: PathBuf,
    /// Rows in the first page of a ranking.
    pub page_size: usize,
    /// Rows added by each "Show more".
    pub page_increment: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            dataset_path: PathBuf::from(DEFAULT_DATASET),
            page_size: DEFAULT_PAGE_SIZE,
            page_increment: DEFAULT_PAGE_SIZE,
        }
    }
}

impl AppConfig {
    /// Defaults, then `SAFMR_*` environment variables, then the first
    /// positional argument as dataset path.
    pub fn from_env() -> Self {
        Self::resolve(env::args().nth(1), |key| env::var(key).ok())
    }

    /// Build a config from an optional path argument and a variable lookup.
    pub fn resolve(path_arg: Option<String>, var: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(value) = var("SAFMR_DATASET") {
            config.dataset_path = PathBuf::from(value);
        }
        if let Some(size) = positive(&var, "SAFMR_PAGE_SIZE") {
            config.page_size = size;
        }
        config.page_increment = positive(&var, "SAFMR_PAGE_INCREMENT").unwrap_or(config.page_size);

        if let Some(path) = path_arg.filter(|p| !p.trim().is_empty()) {
            config.dataset_path = PathBuf::from(path);
        }
        config
    }
}

fn positive(var: &impl Fn(&str) -> Option<String>, key: &str) -> Option<usize> {
    let value = var(key)?;
    match value.trim().parse::<usize>() {
        Ok(n) if n > 0 => Some(n),
        _ => {
            log::warn!("Ignoring {key}={value:?}: expected a positive integer");
            None
        }
    }
}
