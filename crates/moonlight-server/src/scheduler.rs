//! Background job scheduler.
//!
//! Initialises a [`JobScheduler`] at server startup and registers the
//! recurring offer-expiry sweep.

use std::sync::Arc;

use sqlx::PgPool;
use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};

/// Builds and starts the background job scheduler.
///
/// Returns the running [`JobScheduler`] handle, which must be kept alive
/// for the lifetime of the process — dropping it shuts down all jobs.
///
/// # Errors
///
/// Returns [`JobSchedulerError`] if the scheduler cannot be initialised,
/// a job cannot be registered, or the scheduler fails to start.
pub async fn build_scheduler(pool: PgPool) -> Result<JobScheduler, JobSchedulerError> {
    let scheduler = JobScheduler::new().await?;

    register_offer_expiry_job(&scheduler, pool).await?;

    scheduler.start().await?;
    Ok(scheduler)
}

/// Register the hourly offer-expiry sweep (`0 0 * * * *`).
///
/// Active offers whose `valid_until` has passed are flipped to Expired so
/// the storefront never advertises a dead offer for more than an hour.
async fn register_offer_expiry_job(
    scheduler: &JobScheduler,
    pool: PgPool,
) -> Result<(), JobSchedulerError> {
    let pool = Arc::new(pool);

    let job = Job::new_async("0 0 * * * *", move |_uuid, _lock| {
        let pool = Arc::clone(&pool);

        Box::pin(async move {
            match moonlight_db::expire_overdue_offers(&pool).await {
                Ok(0) => {}
                Ok(count) => {
                    tracing::info!(count, "scheduler: expired overdue offers");
                }
                Err(e) => {
                    tracing::error!(error = %e, "scheduler: offer expiry sweep failed");
                }
            }
        })
    })?;

    scheduler.add(job).await?;
    Ok(())
}
