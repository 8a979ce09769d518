use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use chrono::Utc;
use futures::stream::{self, StreamExt};
use tracing::{info, instrument, warn};

use crate::application::services::{InterviewService, UserService};
use crate::domain::{DomainError, Interview};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweepStats {
    pub scanned: usize,
    pub ended: usize,
}

/// Reconciles interviews that outlived their owner's credit balance: once the
/// elapsed seconds exceed the remaining credits, the balance is zeroed and the
/// interview force-ended.
pub struct MonitorService {
    users: Arc<UserService>,
    interviews: Arc<InterviewService>,
    concurrency: usize,
}

impl MonitorService {
    pub fn new(
        users: Arc<UserService>,
        interviews: Arc<InterviewService>,
        concurrency: usize,
    ) -> Self {
        Self {
            users,
            interviews,
            concurrency: concurrency.max(1),
        }
    }

    #[instrument(skip(self))]
    pub async fn sweep(&self) -> Result<SweepStats, DomainError> {
        let ongoing = self.interviews.list_ongoing().await?;
        let scanned = ongoing.len();
        let ended = AtomicUsize::new(0);

        stream::iter(ongoing)
            .for_each_concurrent(self.concurrency, |interview| {
                let ended = &ended;
                async move {
                    match self.reconcile(&interview).await {
                        Ok(true) => {
                            ended.fetch_add(1, Ordering::Relaxed);
                        }
                        Ok(false) => {}
                        Err(e) => {
                            warn!(interview_id = %interview.id, error = %e, "reconcile failed")
                        }
                    }
                }
            })
            .await;

        Ok(SweepStats {
            scanned,
            ended: ended.load(Ordering::Relaxed),
        })
    }

    /// Returns true when the interview was force-ended.
    async fn reconcile(&self, interview: &Interview) -> Result<bool, DomainError> {
        let user = match self.users.get(interview.user_id).await {
            Ok(user) => user,
            // Orphaned interview; nothing to charge against.
            Err(DomainError::UserNotFound) => return Ok(false),
            Err(e) => return Err(e),
        };

        let elapsed = interview.elapsed_seconds(Utc::now());
        if elapsed <= user.credits {
            return Ok(false);
        }

        info!(
            user_id = %user.id,
            interview_id = %interview.id,
            elapsed_seconds = elapsed,
            credits = user.credits,
            "interview overran credits, force-ending"
        );
        self.users.reset_credits(user.id).await?;
        self.interviews.end_by_user(user.id).await?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use uuid::Uuid;

    use crate::domain::ports::InterviewStore;
    use crate::infrastructure::InMemoryStore;

    async fn setup() -> (
        Arc<InMemoryStore>,
        Arc<UserService>,
        Arc<InterviewService>,
        MonitorService,
    ) {
        let store = Arc::new(InMemoryStore::new());
        let users = Arc::new(UserService::new(store.clone(), 30));
        let interviews = Arc::new(InterviewService::new(store.clone(), users.clone()));
        let monitor = MonitorService::new(users.clone(), interviews.clone(), 4);
        (store, users, interviews, monitor)
    }

    #[tokio::test]
    async fn test_sweep_ends_overrunning_interview() {
        let (store, users, interviews, monitor) = setup().await;
        let user = users.register("candidate@example.com", "pw").await.unwrap();
        let started = interviews
            .start(user.id, "Backend Engineer", "https://x/cv")
            .await
            .unwrap();

        // Age the interview past the 30-credit allowance.
        let mut aged = started.clone();
        aged.start_time = Utc::now() - Duration::seconds(31);
        InterviewStore::update(&*store, &aged).await.unwrap();

        let stats = monitor.sweep().await.unwrap();
        assert_eq!(stats, SweepStats { scanned: 1, ended: 1 });

        assert_eq!(users.get(user.id).await.unwrap().credits, 0);
        assert!(interviews.ongoing_by_user(user.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_sweep_leaves_interviews_within_allowance() {
        let (_, users, interviews, monitor) = setup().await;
        let user = users.register("candidate@example.com", "pw").await.unwrap();
        interviews
            .start(user.id, "Backend Engineer", "https://x/cv")
            .await
            .unwrap();

        let stats = monitor.sweep().await.unwrap();
        assert_eq!(stats, SweepStats { scanned: 1, ended: 0 });

        assert_eq!(users.get(user.id).await.unwrap().credits, 30);
        assert!(interviews.ongoing_by_user(user.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_sweep_skips_orphaned_interviews() {
        let (store, _, _, monitor) = setup().await;
        let orphan = Interview::start(Uuid::new_v4(), "Backend Engineer", "https://x/cv");
        InterviewStore::insert(&*store, &orphan).await.unwrap();

        let stats = monitor.sweep().await.unwrap();
        assert_eq!(stats, SweepStats { scanned: 1, ended: 0 });
    }
}
