//! Builds the authorization stack from configuration.

use std::sync::Arc;

use anyhow::Context;
use restaurant_auth::{
    Argon2Verifier, AuthorizationEngine, HandlerRegistry, LoginService, PolicyRegistry,
    TokenService,
};

use crate::config::AppConfig;
use crate::config::loader::load_config;
use crate::memory::MemoryStore;
use crate::observability;
use crate::scope::RequestScope;
use crate::services::RestaurantService;

/// Load `.env` if present. A missing file is not an error.
pub fn load_dotenv() {
    if let Err(e) = dotenvy::dotenv()
        && !matches!(e, dotenvy::Error::Io(ref io_err) if io_err.kind() == std::io::ErrorKind::NotFound)
    {
        tracing::warn!(error = %e, "Failed to load .env file");
    }
}

/// Full startup: `.env`, layered configuration, tracing, then [`App::build`].
///
/// Tracing is installed once the configured level is known, so `RUST_LOG`
/// only competes with `logging.level` at a single point.
pub fn start(config_path: Option<&str>) -> anyhow::Result<App> {
    load_dotenv();

    let config = load_config(config_path).context("failed to load configuration")?;
    let filter_source = observability::init_tracing_with_level(&config.logging.level);
    tracing::info!(
        path = config_path.unwrap_or(crate::config::loader::DEFAULT_CONFIG_PATH),
        level = %config.logging.level,
        ?filter_source,
        "Configuration loaded"
    );

    App::build(config)
}

/// Shared services, built once at startup.
pub struct App {
    pub config: AppConfig,
    pub store: Arc<MemoryStore>,
    pub engine: Arc<AuthorizationEngine>,
    pub tokens: Arc<TokenService>,
    pub accounts: LoginService,
    pub restaurants: RestaurantService,
}

impl App {
    /// Validates `config` and wires every service over a fresh in-memory store.
    pub fn build(config: AppConfig) -> anyhow::Result<Self> {
        config.validate().context("invalid configuration")?;

        let store = Arc::new(MemoryStore::new());
        let engine = AuthorizationEngine::new(
            PolicyRegistry::restaurant_defaults(),
            HandlerRegistry::with_default_handlers(store.clone()),
        )
        .context("authorization engine setup failed")?
        .with_audit(config.auth.audit.clone());
        let engine = Arc::new(engine);

        let tokens = Arc::new(TokenService::new(&config.auth.token));
        let accounts = LoginService::new(store.clone(), Arc::new(Argon2Verifier), tokens.clone())
            .with_audit(config.auth.audit.clone());
        let restaurants = RestaurantService::new(store.clone(), engine.clone());

        tracing::info!(
            issuer = %tokens.issuer(),
            policies = engine.policies().len(),
            "Application initialized"
        );

        Ok(Self {
            config,
            store,
            engine,
            tokens,
            accounts,
            restaurants,
        })
    }

    /// Resolves the principal for one request.
    ///
    /// With auth disabled every caller is anonymous.
    pub fn scope(&self, authorization: Option<&str>) -> RequestScope {
        if !self.config.auth.enabled {
            return RequestScope::anonymous();
        }
        RequestScope::from_authorization(&self.tokens, authorization)
    }
}
