use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Interview {
    pub id: Uuid,
    pub user_id: Uuid,
    pub position_name: String,
    pub resume_url: String,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub duration_minutes: Option<i64>,
    pub active: bool,
}

impl Interview {
    pub fn start(
        user_id: Uuid,
        position_name: impl Into<String>,
        resume_url: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            position_name: position_name.into(),
            resume_url: resume_url.into(),
            start_time: Utc::now(),
            end_time: None,
            duration_minutes: None,
            active: true,
        }
    }

    /// Closes the interview, recording the duration in minutes rounded up.
    pub fn finish(&mut self, end_time: DateTime<Utc>) {
        let elapsed_secs = (end_time - self.start_time).num_seconds().max(0);
        self.end_time = Some(end_time);
        self.duration_minutes = Some((elapsed_secs as u64).div_ceil(60) as i64);
        self.active = false;
    }

    pub fn elapsed_seconds(&self, now: DateTime<Utc>) -> i64 {
        (now - self.start_time).num_seconds().max(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_finish_rounds_duration_up() {
        let mut interview = Interview::start(Uuid::new_v4(), "Backend Engineer", "https://x/cv");
        let end = interview.start_time + Duration::seconds(61);
        interview.finish(end);

        assert!(!interview.active);
        assert_eq!(interview.end_time, Some(end));
        assert_eq!(interview.duration_minutes, Some(2));
    }

    #[test]
    fn test_finish_exact_minute() {
        let mut interview = Interview::start(Uuid::new_v4(), "Backend Engineer", "https://x/cv");
        let end = interview.start_time + Duration::seconds(120);
        interview.finish(end);
        assert_eq!(interview.duration_minutes, Some(2));
    }

    #[test]
    fn test_elapsed_seconds_never_negative() {
        let interview = Interview::start(Uuid::new_v4(), "Backend Engineer", "https://x/cv");
        let before_start = interview.start_time - Duration::seconds(5);
        assert_eq!(interview.elapsed_seconds(before_start), 0);
    }
}
