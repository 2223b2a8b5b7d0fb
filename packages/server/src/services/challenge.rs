use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, SqlErr,
};

use crate::entity::{challenge, challenge_submission};
use crate::error::AppError;
use crate::models::challenge::{CreateChallengeRequest, SubmitChallengeRequest};

/// Challenge CRUD and the submission workflow.
pub struct ChallengeService<'a, C: ConnectionTrait> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> ChallengeService<'a, C> {
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    /// Create a challenge in draft state at the next free position.
    pub async fn create(
        &self,
        payload: &CreateChallengeRequest,
        created_by: i32,
    ) -> Result<challenge::Model, AppError> {
        let position = self.next_position(payload.season_id).await?;
        let now = Utc::now();

        let new_challenge = challenge::ActiveModel {
            season_id: Set(payload.season_id),
            title: Set(payload.title.trim().to_string()),
            description: Set(payload.description.clone()),
            challenge_type: Set(payload.challenge_type.clone()),
            points: Set(payload.points),
            instructions: Set(payload.instructions.clone()),
            hints: Set(payload.hints.as_ref().map(|h| serde_json::json!(h))),
            media_url: Set(payload.media_url.clone()),
            difficulty: Set(payload.difficulty.unwrap_or(1)),
            estimated_minutes: Set(payload.estimated_minutes),
            status: Set("draft".to_string()),
            position: Set(position),
            scheduled_date: Set(payload.scheduled_date),
            created_by: Set(created_by),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        Ok(new_challenge.insert(self.conn).await?)
    }

    pub async fn find(&self, id: i32) -> Result<challenge::Model, AppError> {
        challenge::Entity::find_by_id(id)
            .one(self.conn)
            .await?
            .ok_or_else(|| AppError::NotFound("Challenge not found".into()))
    }

    /// Season challenges ordered by position. Members who cannot manage the
    /// season never see drafts.
    pub async fn list(
        &self,
        season_id: i32,
        status: Option<&str>,
        include_drafts: bool,
    ) -> Result<Vec<challenge::Model>, AppError> {
        let mut select = challenge::Entity::find()
            .filter(challenge::Column::SeasonId.eq(season_id))
            .order_by_asc(challenge::Column::Position);
        if let Some(status) = status {
            select = select.filter(challenge::Column::Status.eq(status));
        }
        if !include_drafts {
            select = select.filter(challenge::Column::Status.ne("draft"));
        }
        Ok(select.all(self.conn).await?)
    }

    pub async fn submission_counts(
        &self,
        challenge_ids: &[i32],
    ) -> Result<HashMap<i32, u64>, AppError> {
        if challenge_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let rows: Vec<(i32, i64)> = challenge_submission::Entity::find()
            .filter(challenge_submission::Column::ChallengeId.is_in(challenge_ids.to_vec()))
            .select_only()
            .column(challenge_submission::Column::ChallengeId)
            .column_as(challenge_submission::Column::Id.count(), "count")
            .group_by(challenge_submission::Column::ChallengeId)
            .into_tuple()
            .all(self.conn)
            .await?;
        Ok(rows.into_iter().map(|(id, n)| (id, n as u64)).collect())
    }

    pub async fn submission_count(&self, challenge_id: i32) -> Result<u64, AppError> {
        Ok(challenge_submission::Entity::find()
            .filter(challenge_submission::Column::ChallengeId.eq(challenge_id))
            .count(self.conn)
            .await?)
    }

    /// Record a member's submission. The unique (challenge, user) index turns
    /// a concurrent double-submit into `AlreadySubmitted`.
    pub async fn submit(
        &self,
        challenge: &challenge::Model,
        user_id: i32,
        payload: SubmitChallengeRequest,
    ) -> Result<challenge_submission::Model, AppError> {
        if matches!(challenge.status.as_str(), "draft" | "cancelled") {
            return Err(AppError::Validation(
                "Challenge is not open for submissions".into(),
            ));
        }

        let new_submission = challenge_submission::ActiveModel {
            challenge_id: Set(challenge.id),
            user_id: Set(user_id),
            content: Set(payload.content),
            media: Set(payload.media.map(|m| serde_json::json!(m))),
            metadata: Set(payload.metadata),
            status: Set("pending".to_string()),
            points_awarded: Set(None),
            feedback: Set(None),
            submitted_at: Set(Utc::now()),
            reviewed_at: Set(None),
            reviewed_by: Set(None),
            ..Default::default()
        };

        match new_submission.insert(self.conn).await {
            Ok(model) => Ok(model),
            Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                Err(AppError::AlreadySubmitted)
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn find_submission(
        &self,
        id: i32,
    ) -> Result<challenge_submission::Model, AppError> {
        challenge_submission::Entity::find_by_id(id)
            .one(self.conn)
            .await?
            .ok_or_else(|| AppError::NotFound("Submission not found".into()))
    }

    /// Submissions for a challenge, optionally restricted to one member.
    pub async fn list_submissions(
        &self,
        challenge_id: i32,
        only_user: Option<i32>,
    ) -> Result<Vec<challenge_submission::Model>, AppError> {
        let mut select = challenge_submission::Entity::find()
            .filter(challenge_submission::Column::ChallengeId.eq(challenge_id))
            .order_by_asc(challenge_submission::Column::SubmittedAt);
        if let Some(user_id) = only_user {
            select = select.filter(challenge_submission::Column::UserId.eq(user_id));
        }
        Ok(select.all(self.conn).await?)
    }

    /// Write the review verdict onto a pending submission.
    pub async fn record_review(
        &self,
        submission: challenge_submission::Model,
        reviewer_id: i32,
        status: &str,
        points_awarded: Option<i32>,
        feedback: Option<String>,
    ) -> Result<challenge_submission::Model, AppError> {
        let mut active: challenge_submission::ActiveModel = submission.into();
        active.status = Set(status.to_string());
        active.points_awarded = Set(points_awarded);
        active.feedback = Set(feedback);
        active.reviewed_at = Set(Some(Utc::now()));
        active.reviewed_by = Set(Some(reviewer_id));
        Ok(active.update(self.conn).await?)
    }

    async fn next_position(&self, season_id: i32) -> Result<i32, AppError> {
        let max_pos: Option<i32> = challenge::Entity::find()
            .filter(challenge::Column::SeasonId.eq(season_id))
            .select_only()
            .column_as(challenge::Column::Position.max(), "max_pos")
            .into_tuple::<Option<i32>>()
            .one(self.conn)
            .await?
            .flatten();
        max_pos
            .unwrap_or(-1)
            .checked_add(1)
            .ok_or_else(|| AppError::Validation("Position overflow".into()))
    }
}
