use crate::config::{ReadinessTimeoutPolicy, StartupConfig};
use crate::db::mysql::PostsStorage;
use crate::db::schema::SEED_POST_COUNT;
use crate::error::BlogError;
use crate::service::connection::ConnectionFactory;
use backon::{ConstantBuilder, Retryable};
use std::time::Duration;
use tokio::time::{Instant, sleep_until, timeout_at};
use tracing::{debug, info, warn};

/// One-time startup work: wait for the database, then reset and seed the
/// `blog` table. Must finish before the HTTP listener is bound.
pub async fn prepare(factory: &ConnectionFactory, startup: &StartupConfig) -> Result<(), BlogError> {
    // While polling, no acquire may outlive one readiness slot.
    let storage = if startup.readiness_attempts > 0 {
        factory.connect_with_acquire_timeout(startup.readiness_interval())?
    } else {
        factory.connect()?
    };
    let result = prepare_with(&storage, startup).await;
    storage.close().await;
    result
}

async fn prepare_with(storage: &PostsStorage, startup: &StartupConfig) -> Result<(), BlogError> {
    wait_until_ready(storage, startup).await?;

    storage.reset_schema().await?;
    let titles = storage.seed(SEED_POST_COUNT).await?;
    info!(count = titles.len(), "blog table recreated and seeded");
    Ok(())
}

/// Readiness poll. Exhaustion is resolved by `startup.on_readiness_timeout`.
pub async fn wait_until_ready(
    storage: &PostsStorage,
    startup: &StartupConfig,
) -> Result<(), BlogError> {
    let attempts = startup.readiness_attempts;
    if attempts == 0 {
        debug!("readiness poll disabled");
        return Ok(());
    }

    // Each attempt paces itself to one interval, so no extra delay here.
    let interval = startup.readiness_interval();
    let policy = ConstantBuilder::default()
        .with_delay(Duration::ZERO)
        .with_max_times(attempts as usize - 1);

    let outcome = (move || async move { paced_ping(storage, interval).await })
        .retry(policy)
        .when(|e: &BlogError| e.is_retryable())
        .notify(|err, _: Duration| {
            debug!("database not ready ({}), retrying", err);
        })
        .await;

    match outcome {
        Ok(()) => {
            info!("database is reachable");
            Ok(())
        }
        Err(e) if !e.is_retryable() => Err(e),
        Err(e) => match startup.on_readiness_timeout {
            ReadinessTimeoutPolicy::Fail => {
                warn!(attempts, error = %e, "giving up on database readiness");
                Err(BlogError::ReadinessTimeout { attempts })
            }
            ReadinessTimeoutPolicy::Proceed => {
                warn!(
                    attempts,
                    error = %e,
                    "database still unreachable; continuing with schema setup"
                );
                Ok(())
            }
        },
    }
}

/// One liveness check occupying exactly one `interval` slot: the ping is cut
/// off at the end of the slot, and a failure waits out the rest of it.
async fn paced_ping(storage: &PostsStorage, interval: Duration) -> Result<(), BlogError> {
    let deadline = Instant::now() + interval;
    let result = match timeout_at(deadline, storage.ping()).await {
        Ok(result) => result,
        Err(_) => Err(BlogError::DatabaseError(sqlx::Error::PoolTimedOut)),
    };
    if result.is_err() {
        sleep_until(deadline).await;
    }
    result
}
