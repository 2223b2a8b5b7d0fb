use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, ModelTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, SqlErr,
};

use crate::entity::{challenge, challenge_submission, score, season, season_member, user_badge};
use crate::error::AppError;
use crate::models::season::CreateSeasonRequest;
use crate::utils::invite;

/// Insert retries when the allocated invitation code collides at commit time.
const CREATE_ATTEMPTS: usize = 3;

/// Season lifecycle and membership operations.
pub struct SeasonService<'a, C: ConnectionTrait> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> SeasonService<'a, C> {
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    /// Create a season and enroll its creator.
    ///
    /// The invitation code is allocated with a lookup first, but the unique
    /// constraint is what guarantees no two seasons share a code: a collision
    /// at insert time just means another attempt with a fresh code.
    pub async fn create(
        &self,
        payload: &CreateSeasonRequest,
        created_by: i32,
    ) -> Result<(season::Model, season_member::Model), AppError> {
        let mut last_err = None;

        for _ in 0..CREATE_ATTEMPTS {
            let code = invite::allocate_code(self.conn).await?;
            let now = Utc::now();
            let new_season = season::ActiveModel {
                title: Set(payload.title.trim().to_string()),
                description: Set(payload.description.clone()),
                location: Set(payload.location.trim().to_string()),
                latitude: Set(payload.latitude),
                longitude: Set(payload.longitude),
                start_date: Set(payload.start_date),
                end_date: Set(payload.end_date),
                cover_image_url: Set(payload.cover_image_url.clone()),
                max_members: Set(payload.max_members),
                invitation_code: Set(code),
                is_active: Set(false),
                is_completed: Set(false),
                created_by: Set(created_by),
                created_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            };

            match new_season.insert(self.conn).await {
                Ok(model) => {
                    let member = self
                        .insert_member(model.id, created_by, "creator", None)
                        .await?;
                    return Ok((model, member));
                }
                Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                    tracing::debug!("Invitation code collided at insert, retrying");
                    last_err = Some(e);
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(AppError::Internal(format!(
            "Season insert kept colliding on invitation code: {}",
            last_err.map(|e| e.to_string()).unwrap_or_default()
        )))
    }

    pub async fn find(&self, id: i32) -> Result<season::Model, AppError> {
        season::Entity::find_by_id(id)
            .one(self.conn)
            .await?
            .ok_or_else(|| AppError::NotFound("Season not found".into()))
    }

    pub async fn find_by_code(&self, code: &str) -> Result<season::Model, AppError> {
        season::Entity::find()
            .filter(season::Column::InvitationCode.eq(code.trim().to_uppercase()))
            .one(self.conn)
            .await?
            .ok_or_else(|| AppError::NotFound("No season with this invitation code".into()))
    }

    /// Page through seasons, newest first. Returns the page and the total count.
    pub async fn list(
        &self,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<season::Model>, u64), AppError> {
        let paginator = season::Entity::find()
            .order_by_desc(season::Column::CreatedAt)
            .paginate(self.conn, per_page);
        let total = paginator.num_items().await?;

        let data = season::Entity::find()
            .order_by_desc(season::Column::CreatedAt)
            .offset(Some((page - 1) * per_page))
            .limit(Some(per_page))
            .all(self.conn)
            .await?;

        Ok((data, total))
    }

    /// Active-member counts for a set of seasons.
    pub async fn member_counts(&self, season_ids: &[i32]) -> Result<HashMap<i32, u64>, AppError> {
        if season_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let rows: Vec<(i32, i64)> = season_member::Entity::find()
            .filter(season_member::Column::SeasonId.is_in(season_ids.to_vec()))
            .filter(season_member::Column::IsActive.eq(true))
            .select_only()
            .column(season_member::Column::SeasonId)
            .column_as(season_member::Column::UserId.count(), "count")
            .group_by(season_member::Column::SeasonId)
            .into_tuple()
            .all(self.conn)
            .await?;

        Ok(rows.into_iter().map(|(id, n)| (id, n as u64)).collect())
    }

    pub async fn member_count(&self, season_id: i32) -> Result<u64, AppError> {
        Ok(self
            .member_counts(&[season_id])
            .await?
            .remove(&season_id)
            .unwrap_or(0))
    }

    pub async fn membership(
        &self,
        season_id: i32,
        user_id: i32,
    ) -> Result<Option<season_member::Model>, AppError> {
        Ok(season_member::Entity::find_by_id((season_id, user_id))
            .one(self.conn)
            .await?)
    }

    /// Membership of an active member, or a 403.
    pub async fn require_member(
        &self,
        season_id: i32,
        user_id: i32,
    ) -> Result<season_member::Model, AppError> {
        self.membership(season_id, user_id)
            .await?
            .filter(|m| m.is_active)
            .ok_or(AppError::PermissionDenied)
    }

    /// Membership with a creator/admin role, or a 403.
    pub async fn require_manager(
        &self,
        season_id: i32,
        user_id: i32,
    ) -> Result<season_member::Model, AppError> {
        let member = self.require_member(season_id, user_id).await?;
        if !member.is_manager() {
            return Err(AppError::PermissionDenied);
        }
        Ok(member)
    }

    /// Enroll a user. Capacity and completion checks happen here; duplicate
    /// joins surface from the composite primary key, not a pre-check.
    pub async fn join(
        &self,
        season: &season::Model,
        user_id: i32,
        nickname: Option<String>,
    ) -> Result<season_member::Model, AppError> {
        if season.is_completed {
            return Err(AppError::Validation("Season is already completed".into()));
        }
        if let Some(max) = season.max_members {
            let current = self.member_count(season.id).await?;
            if current >= max as u64 {
                return Err(AppError::Validation("Season is full".into()));
            }
        }
        self.insert_member(season.id, user_id, "member", nickname)
            .await
    }

    async fn insert_member(
        &self,
        season_id: i32,
        user_id: i32,
        role: &str,
        nickname: Option<String>,
    ) -> Result<season_member::Model, AppError> {
        let now = Utc::now();
        let new_member = season_member::ActiveModel {
            season_id: Set(season_id),
            user_id: Set(user_id),
            role: Set(role.to_string()),
            nickname: Set(nickname),
            is_active: Set(true),
            total_points: Set(0),
            challenges_completed: Set(0),
            badges_earned: Set(0),
            joined_at: Set(now),
            updated_at: Set(now),
        };

        match new_member.insert(self.conn).await {
            Ok(model) => Ok(model),
            Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                Err(AppError::AlreadyMember)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Members of a season joined with their user rows, in join order.
    pub async fn members_with_users(
        &self,
        season_id: i32,
    ) -> Result<Vec<(season_member::Model, Option<crate::entity::user::Model>)>, AppError> {
        Ok(season_member::Entity::find()
            .filter(season_member::Column::SeasonId.eq(season_id))
            .find_also_related(crate::entity::user::Entity)
            .order_by_asc(season_member::Column::JoinedAt)
            .all(self.conn)
            .await?)
    }

    /// Delete a season and everything it owns.
    ///
    /// Children go first to keep foreign keys satisfied; badge records keep
    /// the badge but lose their season reference.
    pub async fn delete(&self, season: season::Model) -> Result<(), AppError> {
        let season_id = season.id;

        score::Entity::delete_many()
            .filter(score::Column::SeasonId.eq(season_id))
            .exec(self.conn)
            .await?;

        let challenge_ids: Vec<i32> = challenge::Entity::find()
            .filter(challenge::Column::SeasonId.eq(season_id))
            .select_only()
            .column(challenge::Column::Id)
            .into_tuple()
            .all(self.conn)
            .await?;
        if !challenge_ids.is_empty() {
            challenge_submission::Entity::delete_many()
                .filter(challenge_submission::Column::ChallengeId.is_in(challenge_ids))
                .exec(self.conn)
                .await?;
        }
        challenge::Entity::delete_many()
            .filter(challenge::Column::SeasonId.eq(season_id))
            .exec(self.conn)
            .await?;

        season_member::Entity::delete_many()
            .filter(season_member::Column::SeasonId.eq(season_id))
            .exec(self.conn)
            .await?;

        user_badge::Entity::update_many()
            .col_expr(
                user_badge::Column::SeasonId,
                sea_orm::prelude::Expr::value(sea_orm::Value::Int(None)),
            )
            .filter(user_badge::Column::SeasonId.eq(season_id))
            .exec(self.conn)
            .await?;

        season.delete(self.conn).await?;
        Ok(())
    }
}
