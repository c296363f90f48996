//! Client startup wiring.

use std::sync::Arc;

use dotenv::dotenv;
use tracing::{debug, warn};

use crate::api::{GradingApi, create_api};
use crate::cache::{ObjectCache, register::get_object_cache_plugin};
use crate::config::AppConfig;
use crate::grading::coordinator::GradeEditCoordinator;
use crate::grading::store::GradeStore;
use crate::notifications::NotificationCenter;
use crate::session::SessionStore;

/// Everything a front end needs to drive the grade table.
pub struct StartupContext {
    pub api: Arc<dyn GradingApi>,
    pub cache: Arc<dyn ObjectCache>,
    pub session: Arc<SessionStore>,
    pub notifier: Arc<NotificationCenter>,
    pub coordinator: Arc<GradeEditCoordinator>,
}

/// Load configuration and install the tracing subscriber.
///
/// The returned guard must stay alive for the lifetime of the process or
/// buffered log lines are dropped on exit.
pub fn bootstrap() -> tracing_appender::non_blocking::WorkerGuard {
    dotenv().ok();
    AppConfig::init().expect("Failed to initialize configuration");
    let config = AppConfig::get();

    let stdout_log = std::io::stdout();
    let (non_blocking_writer, guard) = tracing_appender::non_blocking(stdout_log);
    let filter = tracing_subscriber::EnvFilter::new(&config.app.log_level);
    let tracing_format = tracing_subscriber::fmt::format()
        .with_level(true)
        .with_ansi(true);

    let tracing_builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(non_blocking_writer)
        .event_format(tracing_format);

    if config.is_development() {
        tracing_builder
            .with_file(true)
            .with_line_number(true)
            .init();
    } else {
        tracing_builder.json().init();
    }

    warn!(
        "Starting {} v{}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    );
    guard
}

/// Create the cache backend named in the configuration, falling back to
/// the in-memory backend when that one is unavailable.
async fn create_cache() -> Result<Arc<dyn ObjectCache>, Box<dyn std::error::Error>> {
    let config = AppConfig::get();
    let cache_type = &config.cache.cache_type;

    debug!("Attempting to create {} cache backend", cache_type);

    if let Some(constructor) = get_object_cache_plugin(cache_type) {
        match constructor().await {
            Ok(cache) => {
                debug!("Successfully created {} cache backend", cache_type);
                return Ok(Arc::from(cache));
            }
            Err(e) => {
                warn!("Failed to create {} cache: {}", cache_type, e);
            }
        }
    } else {
        warn!("Cache backend '{}' not found in registry", cache_type);
    }

    if cache_type != "moka"
        && let Some(fallback_constructor) = get_object_cache_plugin("moka")
    {
        warn!("Falling back to Moka (in-memory) cache backend");
        match fallback_constructor().await {
            Ok(cache) => return Ok(Arc::from(cache)),
            Err(fallback_e) => {
                warn!("Failed to create fallback Moka cache: {}", fallback_e);
            }
        }
    }

    Err(format!("No cache backend available (tried: {cache_type})").into())
}

/// Assemble the client: cache, API client, session store, notification
/// center and the reconciliation coordinator on top of them.
pub async fn prepare_client_startup() -> StartupContext {
    let config = AppConfig::get();

    let cache = create_cache().await.expect("Failed to create cache");
    let api = create_api().expect("Failed to create API client");
    let session = Arc::new(SessionStore::open(&config.session.persist_path));
    let notifier = Arc::new(NotificationCenter::new());

    let store = GradeStore::new(cache.clone(), config.cache.default_ttl);
    let coordinator = Arc::new(GradeEditCoordinator::new(
        api.clone(),
        store,
        session.clone(),
        notifier.clone(),
    ));

    StartupContext {
        api,
        cache,
        session,
        notifier,
        coordinator,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_cache_uses_registry() {
        let cache = create_cache().await.unwrap();
        cache
            .insert_raw("startup:probe".into(), "ok".into(), 60)
            .await;
        assert_eq!(
            cache.get_raw("startup:probe").await.into_option().as_deref(),
            Some("ok")
        );
    }
}
