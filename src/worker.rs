use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use interview_pilot::application::{InterviewService, MonitorService, UserService};
use interview_pilot::infrastructure::{create_pool, AppConfig, RedisStore};

/// Interview monitor: periodically force-ends interviews that have outrun
/// their owner's credits.
struct Monitor {
    service: MonitorService,
    interval: Duration,
}

impl Monitor {
    fn new(config: &AppConfig, store: Arc<RedisStore>) -> Self {
        let users = Arc::new(UserService::new(store.clone(), config.credits.signup_grant));
        let interviews = Arc::new(InterviewService::new(store, users.clone()));
        Self {
            service: MonitorService::new(users, interviews, config.monitor.concurrency),
            interval: Duration::from_secs(config.monitor.interval_seconds),
        }
    }

    async fn run(&self) {
        let mut ticker = tokio::time::interval(self.interval);
        loop {
            ticker.tick().await;
            match self.service.sweep().await {
                Ok(stats) => {
                    info!(scanned = stats.scanned, ended = stats.ended, "sweep complete")
                }
                Err(e) => error!(error = %e, "sweep failed"),
            }
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "worker=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenvy::dotenv().ok();

    let config = AppConfig::from_env()?;
    let redis_pool = create_pool(&config.redis_url)?;
    info!("Redis connected");

    let store = Arc::new(RedisStore::new(redis_pool));
    let monitor = Monitor::new(&config, store);

    info!(
        interval_seconds = config.monitor.interval_seconds,
        "worker started"
    );
    monitor.run().await;

    Ok(())
}
