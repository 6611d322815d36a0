use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;

use bucketlink::application::ports::{JobQueue, JobRepository, TaskSource};
use bucketlink::application::services::{BucketWorkerPool, StatusService, SubmissionService};
use bucketlink::infrastructure::bucket::BucketClientFactory;
use bucketlink::infrastructure::observability::{TracingConfig, init_tracing};
use bucketlink::infrastructure::persistence::{PgJobRepository, create_pool, run_migrations};
use bucketlink::infrastructure::queue::job_channel;
use bucketlink::presentation::{AppState, Environment, Settings, create_router};

const WORKER_DRAIN_TIMEOUT: Duration = Duration::from_secs(30);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let environment = Environment::from_env().map_err(anyhow::Error::msg)?;
    let settings = Settings::load(environment)?;

    init_tracing(&TracingConfig::from_settings(environment, &settings.logging));

    let pool = create_pool(&settings.database.url, settings.database.max_connections).await?;
    if settings.database.run_migrations {
        run_migrations(&pool).await?;
    }

    let job_repository: Arc<dyn JobRepository> = Arc::new(PgJobRepository::new(pool.clone()));
    let bucket_client = BucketClientFactory::create(&settings.bucket_client)?;

    let (job_queue, task_source) = job_channel(settings.worker.queue_capacity);
    let job_queue: Arc<dyn JobQueue> = Arc::new(job_queue);
    let task_source: Arc<dyn TaskSource> = Arc::new(task_source);

    let workers = BucketWorkerPool::spawn(
        settings.worker.concurrency,
        task_source,
        Arc::clone(&job_repository),
        bucket_client,
        settings.worker.retry_policy(),
    );
    tracing::info!(workers = workers.len(), "Bucket workers spawned");

    let submission_service = Arc::new(SubmissionService::new(
        Arc::clone(&job_repository),
        job_queue,
    ));

    // Jobs left open by a previous run go back on the channel. Sending waits
    // for room, so it runs beside the server instead of delaying startup.
    let unfinished = submission_service.unfinished_jobs().await?;
    let recovery = tokio::spawn({
        let submission_service = Arc::clone(&submission_service);
        async move {
            match submission_service.requeue(unfinished).await {
                Ok(0) => tracing::debug!("No unfinished jobs to recover"),
                Ok(count) => tracing::info!(count, "Unfinished jobs re-queued"),
                Err(e) => tracing::error!(error = %e, "Failed to re-queue unfinished jobs"),
            }
        }
    });

    let state = AppState {
        submission_service,
        status_service: Arc::new(StatusService::new(job_repository)),
    };

    let router = create_router(state);

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, environment = %environment, "Listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Unsent recovered jobs stay open in the store for the next start.
    recovery.abort();

    // The router owned the last queue sender, so workers now drain and exit.
    tracing::info!("HTTP server stopped, draining bucket workers");
    let drain = async {
        for worker in workers {
            if let Err(e) = worker.await {
                tracing::error!(error = %e, "Bucket worker panicked");
            }
        }
    };
    if tokio::time::timeout(WORKER_DRAIN_TIMEOUT, drain).await.is_err() {
        tracing::warn!("Bucket workers still busy after drain timeout, shutting down anyway");
    }

    pool.close().await;
    tracing::info!("Database connection pool closed");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for ctrl-c");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => tracing::error!(error = %e, "Failed to listen for SIGTERM"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
