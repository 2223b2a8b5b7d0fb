use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, SqlErr,
};

use crate::entity::{badge, challenge_submission, score, season_member, user_badge};
use crate::error::AppError;
use crate::services::user::display_name;

/// A member's progress figures, matched against badge criteria.
#[derive(Debug, Clone, Copy, Default)]
pub struct BadgeProgress {
    pub total_points: i64,
    pub challenges_completed: u64,
    pub streak_days: u32,
}

/// Points ledger, member stats, streaks, and badge evaluation.
pub struct ScoringService<'a, C: ConnectionTrait> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> ScoringService<'a, C> {
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    /// Append a ledger entry and fold it into the member's cumulative stats.
    ///
    /// `completed_challenge` additionally bumps `challenges_completed`.
    pub async fn award(
        &self,
        user_id: i32,
        season_id: i32,
        challenge_id: Option<i32>,
        points: i32,
        score_type: &str,
        description: &str,
        metadata: Option<serde_json::Value>,
        completed_challenge: bool,
    ) -> Result<score::Model, AppError> {
        let now = Utc::now();
        let entry = score::ActiveModel {
            user_id: Set(user_id),
            season_id: Set(season_id),
            challenge_id: Set(challenge_id),
            points: Set(points),
            score_type: Set(score_type.to_string()),
            description: Set(description.to_string()),
            score_date: Set(now.date_naive()),
            metadata: Set(metadata),
            created_at: Set(now),
            ..Default::default()
        };
        let entry = entry.insert(self.conn).await?;

        let member = season_member::Entity::find_by_id((season_id, user_id))
            .one(self.conn)
            .await?
            .ok_or_else(|| AppError::NotFound("Season member not found".into()))?;

        let new_total = member.total_points + points;
        let completed = member.challenges_completed + i32::from(completed_challenge);
        let mut active: season_member::ActiveModel = member.into();
        active.total_points = Set(new_total);
        active.challenges_completed = Set(completed);
        active.updated_at = Set(now);
        active.update(self.conn).await?;

        Ok(entry)
    }

    /// Evaluate all active badges against the member's progress and record the
    /// newly earned ones. Bonus points land as `badge_bonus` ledger entries;
    /// those entries do not re-trigger evaluation.
    pub async fn evaluate_badges(
        &self,
        user_id: i32,
        season_id: i32,
    ) -> Result<Vec<badge::Model>, AppError> {
        let progress = self.progress(user_id, season_id).await?;

        let candidates = badge::Entity::find()
            .filter(badge::Column::IsActive.eq(true))
            .all(self.conn)
            .await?;

        let mut earned = Vec::new();
        for candidate in candidates {
            if !criteria_met(&candidate.criteria, &progress) {
                continue;
            }

            let record = user_badge::ActiveModel {
                user_id: Set(user_id),
                badge_id: Set(candidate.id),
                season_id: Set(Some(season_id)),
                earned_at: Set(Utc::now()),
                progress: Set(Some(serde_json::json!({
                    "total_points": progress.total_points,
                    "challenges_completed": progress.challenges_completed,
                    "streak_days": progress.streak_days,
                }))),
                is_showcased: Set(false),
            };

            match record.insert(self.conn).await {
                Ok(_) => {}
                // Earned earlier (possibly in another season); nothing to do.
                Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                    continue;
                }
                Err(e) => return Err(e.into()),
            }

            if let Some(member) = season_member::Entity::find_by_id((season_id, user_id))
                .one(self.conn)
                .await?
            {
                let badges = member.badges_earned + 1;
                let points = member.total_points + candidate.bonus_points;
                let mut active: season_member::ActiveModel = member.into();
                active.badges_earned = Set(badges);
                active.total_points = Set(points);
                active.updated_at = Set(Utc::now());
                active.update(self.conn).await?;
            }

            if candidate.bonus_points != 0 {
                let now = Utc::now();
                let bonus = score::ActiveModel {
                    user_id: Set(user_id),
                    season_id: Set(season_id),
                    challenge_id: Set(None),
                    points: Set(candidate.bonus_points),
                    score_type: Set("badge_bonus".to_string()),
                    description: Set(format!("Badge earned: {}", candidate.name)),
                    score_date: Set(now.date_naive()),
                    metadata: Set(None),
                    created_at: Set(now),
                    ..Default::default()
                };
                bonus.insert(self.conn).await?;
            }

            tracing::info!(user_id, season_id, badge = %candidate.name, "Badge earned");
            earned.push(candidate);
        }

        Ok(earned)
    }

    /// Current progress figures for a member.
    pub async fn progress(&self, user_id: i32, season_id: i32) -> Result<BadgeProgress, AppError> {
        let member = season_member::Entity::find_by_id((season_id, user_id))
            .one(self.conn)
            .await?
            .ok_or_else(|| AppError::NotFound("Season member not found".into()))?;

        let dates = self.score_dates(user_id, Some(season_id)).await?;
        let (current, _) = streaks(&dates, Utc::now().date_naive());

        Ok(BadgeProgress {
            total_points: member.total_points as i64,
            challenges_completed: member.challenges_completed as u64,
            streak_days: current,
        })
    }

    /// Distinct score dates for a user, ascending.
    pub async fn score_dates(
        &self,
        user_id: i32,
        season_id: Option<i32>,
    ) -> Result<Vec<NaiveDate>, AppError> {
        let mut select = score::Entity::find()
            .filter(score::Column::UserId.eq(user_id))
            .select_only()
            .column(score::Column::ScoreDate)
            .distinct()
            .order_by_asc(score::Column::ScoreDate);
        if let Some(season_id) = season_id {
            select = select.filter(score::Column::SeasonId.eq(season_id));
        }
        Ok(select.into_tuple().all(self.conn).await?)
    }

    /// Sum of ledger points for a user, optionally season-scoped.
    pub async fn points_sum(
        &self,
        user_id: i32,
        season_id: Option<i32>,
    ) -> Result<i64, AppError> {
        let mut select = score::Entity::find().filter(score::Column::UserId.eq(user_id));
        if let Some(season_id) = season_id {
            select = select.filter(score::Column::SeasonId.eq(season_id));
        }
        let sum: Option<i64> = select
            .select_only()
            .column_as(score::Column::Points.sum(), "sum")
            .into_tuple::<Option<i64>>()
            .one(self.conn)
            .await?
            .flatten();
        Ok(sum.unwrap_or(0))
    }

    pub async fn approved_submission_count(&self, user_id: i32) -> Result<u64, AppError> {
        Ok(challenge_submission::Entity::find()
            .filter(challenge_submission::Column::UserId.eq(user_id))
            .filter(challenge_submission::Column::Status.eq("approved"))
            .count(self.conn)
            .await?)
    }

    pub async fn badge_count(&self, user_id: i32) -> Result<u64, AppError> {
        Ok(user_badge::Entity::find()
            .filter(user_badge::Column::UserId.eq(user_id))
            .count(self.conn)
            .await?)
    }

    /// Active members ranked by points; ties keep join order.
    pub async fn leaderboard_entries(
        &self,
        season_id: i32,
    ) -> Result<Vec<crate::models::scoring::LeaderboardEntry>, AppError> {
        use crate::entity::{user, user_profile};

        let rows = season_member::Entity::find()
            .filter(season_member::Column::SeasonId.eq(season_id))
            .filter(season_member::Column::IsActive.eq(true))
            .find_also_related(user::Entity)
            .order_by_desc(season_member::Column::TotalPoints)
            .order_by_asc(season_member::Column::JoinedAt)
            .all(self.conn)
            .await?;

        let user_ids: Vec<i32> = rows.iter().map(|(m, _)| m.user_id).collect();
        let profiles: std::collections::HashMap<i32, user_profile::Model> =
            if user_ids.is_empty() {
                Default::default()
            } else {
                user_profile::Entity::find()
                    .filter(user_profile::Column::UserId.is_in(user_ids))
                    .all(self.conn)
                    .await?
                    .into_iter()
                    .map(|p| (p.user_id, p))
                    .collect()
            };

        let entries = rows
            .into_iter()
            .enumerate()
            .map(|(i, (member, account))| {
                let profile = profiles.get(&member.user_id);
                let name = match account {
                    Some(ref account) => display_name(
                        member.nickname.as_deref(),
                        profile.map(|p| p.display_name.as_str()),
                        account.username.as_deref(),
                        &account.email,
                    ),
                    None => format!("user {}", member.user_id),
                };
                crate::models::scoring::LeaderboardEntry {
                    rank: i as u64 + 1,
                    user_id: member.user_id,
                    display_name: name,
                    total_points: member.total_points,
                    challenges_completed: member.challenges_completed,
                    badges_earned: member.badges_earned,
                }
            })
            .collect();

        Ok(entries)
    }
}

/// Match a badge's JSON criteria against progress figures.
/// Unknown or malformed criteria never match.
pub fn criteria_met(criteria: &serde_json::Value, progress: &BadgeProgress) -> bool {
    let Some(kind) = criteria.get("type").and_then(|t| t.as_str()) else {
        return false;
    };
    match kind {
        "points_total" => criteria
            .get("points")
            .and_then(|p| p.as_i64())
            .is_some_and(|points| progress.total_points >= points),
        "challenge_count" => criteria
            .get("count")
            .and_then(|c| c.as_u64())
            .is_some_and(|count| progress.challenges_completed >= count),
        "streak_days" => criteria
            .get("days")
            .and_then(|d| d.as_u64())
            .is_some_and(|days| progress.streak_days as u64 >= days),
        _ => false,
    }
}

/// Compute (current, longest) streaks of consecutive days.
///
/// `dates` must be distinct and ascending. The current streak counts a run
/// ending today or yesterday; an older run has been broken already.
pub fn streaks(dates: &[NaiveDate], today: NaiveDate) -> (u32, u32) {
    if dates.is_empty() {
        return (0, 0);
    }

    let mut longest = 1u32;
    let mut run = 1u32;
    for pair in dates.windows(2) {
        if (pair[1] - pair[0]).num_days() == 1 {
            run += 1;
        } else {
            run = 1;
        }
        longest = longest.max(run);
    }

    let last = dates[dates.len() - 1];
    let gap = (today - last).num_days();
    let current = if gap <= 1 { run } else { 0 };

    (current, longest)
}
