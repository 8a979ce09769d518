use std::sync::Arc;

use tracing::instrument;
use uuid::Uuid;

use crate::application::services::{InterviewService, UserService};
use crate::domain::{ports::LlmService, DomainError};

pub struct AnswerRequest {
    pub interview_id: Uuid,
    pub job_position: String,
    pub question: String,
    pub language: String,
    pub resume_content: String,
}

#[derive(Debug)]
pub struct AnswerOutcome {
    pub answer: String,
    pub remaining_credits: i64,
}

/// Generates candidate answers during a live interview, charging credits per
/// answer.
pub struct AnswerService {
    llm: Arc<dyn LlmService>,
    users: Arc<UserService>,
    interviews: Arc<InterviewService>,
    answer_cost: i64,
}

impl AnswerService {
    pub fn new(
        llm: Arc<dyn LlmService>,
        users: Arc<UserService>,
        interviews: Arc<InterviewService>,
        answer_cost: i64,
    ) -> Self {
        Self {
            llm,
            users,
            interviews,
            answer_cost,
        }
    }

    #[instrument(skip(self, request), fields(interview_id = %request.interview_id))]
    pub async fn generate(&self, request: &AnswerRequest) -> Result<AnswerOutcome, DomainError> {
        let interview = self
            .interviews
            .ongoing(request.interview_id)
            .await?
            .ok_or(DomainError::InterviewNotFound)?;

        let user = self.users.get(interview.user_id).await?;
        if !user.has_credits() {
            return Err(DomainError::InsufficientCredits);
        }

        let answer = self
            .llm
            .complete_with_system(&system_prompt(&request.language), &user_prompt(request))
            .await?;

        // Charge only after the model answered.
        let user = self.users.deduct_credits(user.id, self.answer_cost).await?;

        Ok(AnswerOutcome {
            answer,
            remaining_credits: user.credits,
        })
    }
}

fn system_prompt(language: &str) -> String {
    format!(
        "You are a job candidate in an interview. Answer questions in {language} \
         based on the provided resume. Your responses should be concise, \
         highlighting only the most relevant points. Be professional and \
         specific, focusing on key achievements and skills."
    )
}

fn user_prompt(request: &AnswerRequest) -> String {
    format!(
        "Job Position: {}\n\nResume content:\n\n{}\n\nInterviewer's question: {}\n\
         Provide a brief, focused answer highlighting key points.",
        request.job_position, request.resume_content, request.question
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::infrastructure::InMemoryStore;

    struct FixedLlm {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl LlmService for FixedLlm {
        async fn complete(&self, _prompt: &str) -> Result<String, DomainError> {
            self.calls.fetch_add(1, Ordering::Relaxed);
            Ok("canned answer".into())
        }

        async fn complete_with_system(
            &self,
            _system: &str,
            _prompt: &str,
        ) -> Result<String, DomainError> {
            self.complete(_prompt).await
        }
    }

    async fn setup() -> (Arc<UserService>, Arc<InterviewService>, AnswerService) {
        let store = Arc::new(InMemoryStore::new());
        let users = Arc::new(UserService::new(store.clone(), 30));
        let interviews = Arc::new(InterviewService::new(store.clone(), users.clone()));
        let answers = AnswerService::new(
            Arc::new(FixedLlm {
                calls: AtomicUsize::new(0),
            }),
            users.clone(),
            interviews.clone(),
            1,
        );
        (users, interviews, answers)
    }

    fn request(interview_id: Uuid) -> AnswerRequest {
        AnswerRequest {
            interview_id,
            job_position: "Backend Engineer".into(),
            question: "Why Rust?".into(),
            language: "English".into(),
            resume_content: "Ten years of systems programming.".into(),
        }
    }

    #[tokio::test]
    async fn test_generate_deducts_a_credit() {
        let (users, interviews, answers) = setup().await;
        let user = users.register("candidate@example.com", "pw").await.unwrap();
        let interview = interviews
            .start(user.id, "Backend Engineer", "https://x/cv")
            .await
            .unwrap();

        let outcome = answers.generate(&request(interview.id)).await.unwrap();
        assert_eq!(outcome.answer, "canned answer");
        assert_eq!(outcome.remaining_credits, 29);
    }

    #[tokio::test]
    async fn test_generate_requires_ongoing_interview() {
        let (_, _, answers) = setup().await;
        let err = answers.generate(&request(Uuid::new_v4())).await.unwrap_err();
        assert!(matches!(err, DomainError::InterviewNotFound));
    }

    #[tokio::test]
    async fn test_generate_requires_credits() {
        let (users, interviews, answers) = setup().await;
        let user = users.register("candidate@example.com", "pw").await.unwrap();
        let interview = interviews
            .start(user.id, "Backend Engineer", "https://x/cv")
            .await
            .unwrap();
        users.reset_credits(user.id).await.unwrap();

        let err = answers.generate(&request(interview.id)).await.unwrap_err();
        assert!(matches!(err, DomainError::InsufficientCredits));
    }

    #[tokio::test]
    async fn test_prompts_mention_language_and_resume() {
        let system = system_prompt("Mandarin");
        assert!(system.contains("Answer questions in Mandarin"));

        let prompt = user_prompt(&request(Uuid::new_v4()));
        assert!(prompt.contains("Job Position: Backend Engineer"));
        assert!(prompt.contains("Ten years of systems programming."));
        assert!(prompt.contains("Why Rust?"));
    }
}
