use crate::config::Config;
use crate::error::AppResult;
use crate::prefs::PreferenceStore;
use crate::providers::{
    AlphaVantageProvider, MockProvider, RatioProvider, ReportListProvider, StockListProvider,
};
use crate::reports::ReportManager;
use crate::share::{ClipboardShare, ShareTarget};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Everything the handlers share.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub prefs: PreferenceStore,
    pub ratios: Arc<dyn RatioProvider>,
    pub stocks: Arc<dyn StockListProvider>,
    pub reports: Arc<Mutex<ReportManager>>,
    pub share: Arc<dyn ShareTarget>,
}

impl AppState {
    /// Wire up the providers named by `config` and load the report list.
    pub async fn new(config: Config, prefs: PreferenceStore) -> AppResult<Self> {
        let mock = Arc::new(MockProvider::new(
            config.delays.ratio_fetch,
            config.delays.stock_fetch,
        ));

        let ratios: Arc<dyn RatioProvider> = match config.alpha_vantage_api_key.as_deref() {
            Some(key) => {
                tracing::info!("Using Alpha Vantage for company ratios");
                Arc::new(AlphaVantageProvider::new(key))
            }
            None => {
                tracing::info!("Using mock company ratios");
                mock.clone()
            }
        };

        let files = mock.fetch_reports().await?;
        tracing::debug!("Loaded {} report(s)", files.len());

        Ok(AppState {
            config: Arc::new(config),
            prefs,
            ratios,
            stocks: mock,
            reports: Arc::new(Mutex::new(ReportManager::new(files))),
            share: Arc::new(ClipboardShare),
        })
    }

    pub fn with_ratio_provider(mut self, provider: Arc<dyn RatioProvider>) -> Self {
        self.ratios = provider;
        self
    }

    pub fn with_share_target(mut self, target: Arc<dyn ShareTarget>) -> Self {
        self.share = target;
        self
    }
}
