use cartera_core::api::{ApiClient, ApiError};
use cartera_core::charts::ChartRegistry;
use cartera_core::dashboard::Dashboard;
use cartera_types::AppConfig;

use crate::text_chart::{TextChart, TextChartEngine};

/// Everything the REPL session owns
pub struct AppState {
    pub config: AppConfig,
    pub dashboard: Dashboard,
    pub client: ApiClient,
    pub charts: ChartRegistry<TextChart>,
    pub engine: TextChartEngine,
}

impl AppState {
    pub fn new(config: AppConfig) -> Result<Self, ApiError> {
        let client = ApiClient::from_config(&config)?;
        Ok(Self {
            dashboard: Dashboard::new(&config),
            engine: TextChartEngine::from_config(&config),
            charts: ChartRegistry::new(),
            client,
            config,
        })
    }

    /// Apply a changed config to the client, engine and dashboard.
    ///
    /// The filter selection survives; the client is only swapped once the
    /// new one was built successfully.
    pub fn reconfigure(&mut self, config: AppConfig) -> Result<(), ApiError> {
        self.client = ApiClient::from_config(&config)?;
        self.engine = TextChartEngine::from_config(&config);
        self.dashboard.set_policy(config.label_policy);
        self.dashboard.set_debug(config.debug.clone());
        self.config = config;
        Ok(())
    }
}

impl Drop for AppState {
    fn drop(&mut self) {
        self.charts.release_all();
    }
}
