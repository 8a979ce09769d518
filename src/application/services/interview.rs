use std::sync::Arc;

use chrono::Utc;
use tracing::instrument;
use uuid::Uuid;

use crate::application::services::UserService;
use crate::domain::{
    pagination::{PageInfo, PageRequest},
    ports::InterviewStore,
    DomainError, Interview,
};

pub struct InterviewService {
    store: Arc<dyn InterviewStore>,
    users: Arc<UserService>,
}

impl InterviewService {
    pub fn new(store: Arc<dyn InterviewStore>, users: Arc<UserService>) -> Self {
        Self { store, users }
    }

    /// Starts an interview for the user. Requires a positive credit balance
    /// and no other interview in progress.
    #[instrument(skip(self))]
    pub async fn start(
        &self,
        user_id: Uuid,
        position_name: &str,
        resume_url: &str,
    ) -> Result<Interview, DomainError> {
        let user = self.users.get(user_id).await?;
        if !user.has_credits() {
            return Err(DomainError::InsufficientCredits);
        }
        if self.store.ongoing_by_user(user_id).await?.is_some() {
            return Err(DomainError::InterviewAlreadyStarted);
        }

        let interview = Interview::start(user_id, position_name, resume_url);
        self.store.insert(&interview).await?;
        Ok(interview)
    }

    /// Ends the user's ongoing interview, stamping the end time and duration.
    #[instrument(skip(self))]
    pub async fn end_by_user(&self, user_id: Uuid) -> Result<Interview, DomainError> {
        let mut interview = self
            .store
            .ongoing_by_user(user_id)
            .await?
            .ok_or(DomainError::InterviewNotFound)?;

        interview.finish(Utc::now());
        self.store.update(&interview).await?;
        Ok(interview)
    }

    /// The interview with this id, if it exists and is still active.
    pub async fn ongoing(&self, interview_id: Uuid) -> Result<Option<Interview>, DomainError> {
        Ok(self.store.get(interview_id).await?.filter(|i| i.active))
    }

    pub async fn ongoing_by_user(&self, user_id: Uuid) -> Result<Option<Interview>, DomainError> {
        self.store.ongoing_by_user(user_id).await
    }

    pub async fn list_ongoing(&self) -> Result<Vec<Interview>, DomainError> {
        self.store.list_ongoing().await
    }

    pub async fn history(
        &self,
        user_id: Uuid,
        page: PageRequest,
    ) -> Result<(Vec<Interview>, PageInfo), DomainError> {
        let (interviews, total) = self
            .store
            .list_by_user(user_id, page.offset(), page.limit)
            .await?;
        Ok((interviews, PageInfo::compute(total, page)))
    }
}
