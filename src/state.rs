use std::path::PathBuf;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::data::cache::{DatasetCache, LoadedDataset};
use crate::data::filter::{RankQuery, RankResult, SortDirection, rank};
use crate::data::lookup::{RentQuery, RentResult, lookup};
use crate::data::schema::{BedroomTier, RentTier, region_list};

// ---------------------------------------------------------------------------
// Mode state machine
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QueryMode {
    #[default]
    PointLookup,
    Rank,
}

/// Everything the user can do that the state reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserAction {
    SelectPointLookup,
    SelectRank,
    /// "Find Rent" / "Rank ZIP codes", depending on the mode.
    Submit,
    /// Enlarge the ranking page and re-run it.
    ShowMore,
    OpenDataset(PathBuf),
    Reload,
}

/// Next mode for an action. Only the two mode buttons switch modes.
pub fn transition(mode: QueryMode, action: &UserAction) -> QueryMode {
    match action {
        UserAction::SelectPointLookup => QueryMode::PointLookup,
        UserAction::SelectRank => QueryMode::Rank,
        _ => mode,
    }
}

// ---------------------------------------------------------------------------
// Form state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

impl Notice {
    fn warning(text: impl Into<String>) -> Self {
        Notice {
            level: NoticeLevel::Warning,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PointForm {
    pub zip_input: String,
    pub bedroom: BedroomTier,
    pub result: Option<RentResult>,
}

#[derive(Debug, Clone, Default)]
pub struct RankForm {
    pub region: String,
    pub bedroom: BedroomTier,
    pub tier: RentTier,
    pub min_input: String,
    pub max_input: String,
    pub direction: SortDirection,
    /// Rows requested by the last run; grows with "Show more".
    pub page_size: usize,
    /// Query behind `result`. "Show more" re-runs this, not the live inputs.
    pub last_query: Option<RankQuery>,
    pub result: Option<RankResult>,
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub cache: Arc<DatasetCache>,
    pub config: AppConfig,

    /// Snapshot all queries run against.
    pub dataset: Arc<LoadedDataset>,

    /// Region codes offered by the region selector.
    pub regions: Vec<String>,

    pub mode: QueryMode,
    pub point: PointForm,
    pub rank: RankForm,

    /// Status / error message shown in the UI.
    pub notice: Option<Notice>,
}

impl AppState {
    pub fn new(cache: Arc<DatasetCache>, config: AppConfig) -> Self {
        let dataset = cache.load();
        let mut state = Self {
            cache,
            dataset: Arc::clone(&dataset),
            regions: Vec::new(),
            mode: QueryMode::default(),
            point: PointForm::default(),
            rank: RankForm {
                page_size: config.page_size,
                ..RankForm::default()
            },
            config,
            notice: None,
        };
        state.set_dataset(dataset);
        state
    }

    /// Ingest a newly published snapshot and reset query results.
    pub fn set_dataset(&mut self, dataset: Arc<LoadedDataset>) {
        self.regions = region_list(&dataset.table).into_iter().collect();
        if !self.regions.contains(&self.rank.region) {
            self.rank.region = self.regions.first().cloned().unwrap_or_default();
        }
        self.point.result = None;
        self.rank.result = None;
        self.rank.last_query = None;
        self.rank.page_size = self.config.page_size;

        self.notice = Some(match &dataset.error {
            Some(e) => Notice {
                level: NoticeLevel::Error,
                text: format!("Error loading file: {e}"),
            },
            None => Notice {
                level: NoticeLevel::Info,
                text: format!(
                    "{} ZIP codes loaded from {}",
                    dataset.table.len(),
                    dataset.source.display()
                ),
            },
        });
        self.dataset = dataset;
    }

    /// Apply a user action: move the mode machine, then run whatever query
    /// the action asks for.
    pub fn apply(&mut self, action: UserAction) {
        let next = transition(self.mode, &action);
        if next != self.mode {
            self.clear_warning();
        }
        self.mode = next;

        match action {
            UserAction::SelectPointLookup | UserAction::SelectRank => {}
            UserAction::Submit => match self.mode {
                QueryMode::PointLookup => self.run_lookup(),
                QueryMode::Rank => {
                    self.rank.page_size = self.config.page_size;
                    self.run_rank();
                }
            },
            UserAction::ShowMore => {
                if self.mode == QueryMode::Rank {
                    self.show_more();
                }
            }
            UserAction::OpenDataset(path) => {
                let snapshot = self.cache.replace_source(path);
                self.set_dataset(snapshot);
            }
            UserAction::Reload => {
                let snapshot = self.cache.reload();
                self.set_dataset(snapshot);
            }
        }
    }

    /// Drop a stale warning; load errors stay until a dataset loads cleanly.
    fn clear_warning(&mut self) {
        if self
            .notice
            .as_ref()
            .is_some_and(|n| n.level != NoticeLevel::Error)
        {
            self.notice = None;
        }
    }

    fn run_lookup(&mut self) {
        let zip = self.point.zip_input.trim();
        if zip.is_empty() {
            self.point.result = None;
            self.notice = Some(Notice::warning("Please enter a valid ZIP code."));
            return;
        }

        let query = RentQuery {
            postal_code: zip.to_string(),
            bedroom: self.point.bedroom,
        };
        self.point.result = Some(lookup(&self.dataset.table, &query));
        self.clear_warning();
    }

    fn run_rank(&mut self) {
        if self.rank.region.is_empty() {
            self.rank.result = None;
            self.rank.last_query = None;
            self.notice = Some(Notice::warning("Select a region first."));
            return;
        }

        let (min_rent, max_rent) = match (
            parse_bound(&self.rank.min_input),
            parse_bound(&self.rank.max_input),
        ) {
            (Ok(min), Ok(max)) => (min, max),
            _ => {
                self.rank.result = None;
                self.rank.last_query = None;
                self.notice = Some(Notice::warning("Rent bounds must be numbers."));
                return;
            }
        };

        match (min_rent, max_rent) {
            (Some(min), Some(max)) if min > max => {
                self.notice = Some(Notice::warning("Minimum rent is greater than maximum rent."));
            }
            _ => self.clear_warning(),
        }

        let query = RankQuery {
            region_code: self.rank.region.clone(),
            bedroom: self.rank.bedroom,
            tier: self.rank.tier,
            min_rent,
            max_rent,
            direction: self.rank.direction,
            page_size: Some(self.rank.page_size),
        };
        self.rank.result = Some(rank(&self.dataset.table, &query));
        self.rank.last_query = Some(query);
    }

    /// Same query as the rows on screen, with a larger page.
    fn show_more(&mut self) {
        let Some(query) = self.rank.last_query.as_mut() else {
            return;
        };
        self.rank.page_size += self.config.page_increment;
        query.page_size = Some(self.rank.page_size);
        self.rank.result = Some(rank(&self.dataset.table, query));
    }
}

/// Empty input means "no bound"; `$` and `,` are tolerated.
fn parse_bound(input: &str) -> Result<Option<f64>, std::num::ParseFloatError> {
    let cleaned: String = input
        .trim()
        .chars()
        .filter(|c| *c != '$' && *c != ',')
        .collect();
    if cleaned.is_empty() {
        return Ok(None);
    }
    cleaned.parse::<f64>().map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{Builder, NamedTempFile};

    fn dataset() -> NamedTempFile {
        let mut file = Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(
            file,
            "ZIP Code,HUD Fair Market Rent Area Name,SAFMR 2BR,\
             SAFMR 2BR - 90% Payment Standard,SAFMR 2BR - 110% Payment Standard"
        )
        .unwrap();
        for (i, rent) in [1500, 1700, 1300, 1600, 1200].iter().enumerate() {
            let low = rent * 9 / 10;
            let high = rent * 11 / 10;
            let area = "\"Los Angeles-Long Beach, CA HUD Metro FMR Area\"";
            writeln!(file, "9000{i},{area},{rent},{low},{high}").unwrap();
        }
        writeln!(file, "501,\"Nassau-Suffolk, NY HUD Metro FMR Area\",2100,1890,2310").unwrap();
        file
    }

    fn state(file: &NamedTempFile) -> AppState {
        let config = AppConfig {
            dataset_path: file.path().to_path_buf(),
            page_size: 2,
            page_increment: 2,
        };
        let cache = Arc::new(DatasetCache::new(&config.dataset_path));
        AppState::new(cache, config)
    }

    #[test]
    fn only_mode_buttons_change_mode() {
        assert_eq!(
            transition(QueryMode::PointLookup, &UserAction::SelectRank),
            QueryMode::Rank
        );
        assert_eq!(
            transition(QueryMode::Rank, &UserAction::SelectPointLookup),
            QueryMode::PointLookup
        );
        for action in [UserAction::Submit, UserAction::ShowMore, UserAction::Reload] {
            assert_eq!(transition(QueryMode::Rank, &action), QueryMode::Rank);
            assert_eq!(transition(QueryMode::PointLookup, &action), QueryMode::PointLookup);
        }
    }

    #[test]
    fn regions_come_from_the_dataset() {
        let file = dataset();
        let state = state(&file);
        assert_eq!(state.regions, vec!["CA".to_string(), "NY".to_string()]);
        assert_eq!(state.rank.region, "CA");
        assert_eq!(state.notice.as_ref().map(|n| n.level), Some(NoticeLevel::Info));
    }

    #[test]
    fn empty_zip_warns_without_querying() {
        let file = dataset();
        let mut state = state(&file);
        state.point.zip_input = "   ".into();
        state.apply(UserAction::Submit);

        assert!(state.point.result.is_none());
        assert_eq!(state.notice.as_ref().map(|n| n.level), Some(NoticeLevel::Warning));
    }

    #[test]
    fn point_lookup_pads_input() {
        let file = dataset();
        let mut state = state(&file);
        state.point.zip_input = "501".into();
        state.apply(UserAction::Submit);

        assert!(matches!(state.point.result, Some(RentResult::Found(f)) if f.standard == 2100));
    }

    #[test]
    fn show_more_grows_the_page() {
        let file = dataset();
        let mut state = state(&file);
        state.apply(UserAction::SelectRank);
        state.apply(UserAction::Submit);

        let first = state.rank.result.clone().unwrap();
        assert_eq!(first.entries.len(), 2);
        assert!(first.has_more);
        assert_eq!(first.total_matches, 5);
        assert_eq!(first.entries[0].rent, 1200.0);

        state.apply(UserAction::ShowMore);
        state.apply(UserAction::ShowMore);
        let all = state.rank.result.clone().unwrap();
        assert_eq!(all.entries.len(), 5);
        assert!(!all.has_more);
        assert_eq!(&all.entries[..2], &first.entries[..]);

        // A fresh submit starts over at the configured page size.
        state.apply(UserAction::Submit);
        assert_eq!(state.rank.result.as_ref().unwrap().entries.len(), 2);
    }

    #[test]
    fn show_more_ignores_unsubmitted_edits() {
        let file = dataset();
        let mut state = state(&file);
        state.apply(UserAction::SelectRank);
        state.apply(UserAction::Submit);
        let shown = state.rank.result.clone().unwrap();
        let shown_rents: Vec<f64> = shown.entries.iter().map(|e| e.rent).collect();
        assert_eq!(shown_rents, vec![1200.0, 1300.0]);

        // Edited but not submitted.
        state.rank.direction = SortDirection::Descending;
        state.rank.min_input = "1400".into();
        state.apply(UserAction::ShowMore);

        let grown = state.rank.result.clone().unwrap();
        let grown_rents: Vec<f64> = grown.entries.iter().map(|e| e.rent).collect();
        assert_eq!(grown_rents, vec![1200.0, 1300.0, 1500.0, 1600.0]);
        assert_eq!(&grown.entries[..2], &shown.entries[..]);
        assert_eq!(
            state.rank.last_query.as_ref().map(|q| q.direction),
            Some(SortDirection::Ascending)
        );

        // Submitting picks the edits up.
        state.apply(UserAction::Submit);
        let resubmitted = state.rank.result.as_ref().unwrap();
        let resubmitted: Vec<f64> = resubmitted.entries.iter().map(|e| e.rent).collect();
        assert_eq!(resubmitted, vec![1700.0, 1600.0]);
    }

    #[test]
    fn show_more_before_any_ranking_does_nothing() {
        let file = dataset();
        let mut state = state(&file);
        state.apply(UserAction::SelectRank);
        state.apply(UserAction::ShowMore);

        assert!(state.rank.result.is_none());
        assert_eq!(state.rank.page_size, 2);
    }

    #[test]
    fn inverted_bounds_warn_and_return_nothing() {
        let file = dataset();
        let mut state = state(&file);
        state.apply(UserAction::SelectRank);
        state.rank.min_input = "$1,600".into();
        state.rank.max_input = "1000".into();
        state.apply(UserAction::Submit);

        assert!(state.rank.result.as_ref().unwrap().is_empty());
        assert_eq!(state.notice.as_ref().map(|n| n.level), Some(NoticeLevel::Warning));

        state.rank.min_input = "abc".into();
        state.apply(UserAction::Submit);
        assert!(state.rank.result.is_none());
    }

    #[test]
    fn missing_dataset_is_a_notice_not_a_crash() {
        let config = AppConfig {
            dataset_path: PathBuf::from("/no/such/FY25_FMRs_revised.xlsx"),
            ..AppConfig::default()
        };
        let cache = Arc::new(DatasetCache::new(&config.dataset_path));
        let mut state = AppState::new(cache, config);

        assert_eq!(state.notice.as_ref().map(|n| n.level), Some(NoticeLevel::Error));
        assert!(state.regions.is_empty());

        state.point.zip_input = "99999".into();
        state.apply(UserAction::Submit);
        assert_eq!(state.point.result, Some(RentResult::NotFound));

        let file = dataset();
        state.apply(UserAction::OpenDataset(file.path().to_path_buf()));
        assert_eq!(state.notice.as_ref().map(|n| n.level), Some(NoticeLevel::Info));
        assert_eq!(state.regions.len(), 2);
    }
}
