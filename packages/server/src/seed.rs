use sea_orm::sea_query::{Index, PostgresQueryBuilder, SqliteQueryBuilder};
use sea_orm::*;
use tracing::info;

use crate::entity::{badge, challenge_submission, score};

/// Default badge catalog seeded on startup.
/// (name, description, category, criteria, rarity, bonus_points, hidden)
const DEFAULT_BADGES: &[(&str, &str, &str, &str, &str, i32, bool)] = &[
    (
        "First Steps",
        "Complete your first challenge",
        "achievement",
        r#"{"type": "challenge_count", "count": 1}"#,
        "common",
        5,
        false,
    ),
    (
        "Challenge Hunter",
        "Complete ten challenges in a season",
        "milestone",
        r#"{"type": "challenge_count", "count": 10}"#,
        "rare",
        25,
        false,
    ),
    (
        "Point Collector",
        "Reach 500 points in a season",
        "milestone",
        r#"{"type": "points_total", "points": 500}"#,
        "rare",
        25,
        false,
    ),
    (
        "High Roller",
        "Reach 1000 points in a season",
        "milestone",
        r#"{"type": "points_total", "points": 1000}"#,
        "epic",
        50,
        false,
    ),
    (
        "On Fire",
        "Score on three days in a row",
        "streak",
        r#"{"type": "streak_days", "days": 3}"#,
        "common",
        10,
        false,
    ),
    (
        "Unstoppable",
        "Score every day for a week",
        "streak",
        r#"{"type": "streak_days", "days": 7}"#,
        "legendary",
        100,
        true,
    ),
];

/// Seed the badge catalog. Idempotent: existing names are left untouched.
pub async fn seed_badges(db: &DatabaseConnection) -> Result<(), DbErr> {
    let mut inserted = 0u32;
    for &(name, description, category, criteria, rarity, bonus_points, hidden) in DEFAULT_BADGES {
        let criteria: serde_json::Value = serde_json::from_str(criteria)
            .map_err(|e| DbErr::Custom(format!("Bad seed criteria for '{name}': {e}")))?;
        let now = chrono::Utc::now();
        let model = badge::ActiveModel {
            name: Set(name.to_string()),
            description: Set(description.to_string()),
            category: Set(category.to_string()),
            icon_url: Set(None),
            color: Set("#FFD700".to_string()),
            criteria: Set(criteria),
            rarity: Set(rarity.to_string()),
            bonus_points: Set(bonus_points),
            is_active: Set(true),
            is_hidden: Set(hidden),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = badge::Entity::insert(model)
            .on_conflict(
                sea_orm::sea_query::OnConflict::column(badge::Column::Name)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(db)
            .await;

        match result {
            Ok(_) => inserted += 1,
            Err(DbErr::RecordNotInserted) => {}
            Err(e) => return Err(e),
        }
    }

    if inserted > 0 {
        info!("Seeded {} new badges", inserted);
    }
    Ok(())
}

/// Ensure indexes the entity schema-sync cannot express.
///
/// The unique (challenge, user) submission index is load-bearing: it is what
/// turns a concurrent double-submit into a constraint violation.
pub async fn ensure_indexes(db: &DatabaseConnection) -> Result<(), DbErr> {
    let statements = [
        Index::create()
            .if_not_exists()
            .name("idx_submission_challenge_user")
            .table(challenge_submission::Entity)
            .col(challenge_submission::Column::ChallengeId)
            .col(challenge_submission::Column::UserId)
            .unique()
            .to_owned(),
        // Leaderboard and ledger lookups:
        // SELECT ... FROM score WHERE season_id = ? AND user_id = ?
        Index::create()
            .if_not_exists()
            .name("idx_score_season_user")
            .table(score::Entity)
            .col(score::Column::SeasonId)
            .col(score::Column::UserId)
            .to_owned(),
        // Streak queries: distinct score dates per user.
        Index::create()
            .if_not_exists()
            .name("idx_score_user_date")
            .table(score::Entity)
            .col(score::Column::UserId)
            .col(score::Column::ScoreDate)
            .to_owned(),
    ];

    for stmt in statements {
        let sql = match db.get_database_backend() {
            DbBackend::Sqlite => stmt.to_string(SqliteQueryBuilder),
            _ => stmt.to_string(PostgresQueryBuilder),
        };
        match db.execute_unprepared(&sql).await {
            Ok(_) => {}
            Err(e) => {
                tracing::warn!("Failed to create index: {} ({})", e, sql);
            }
        }
    }

    Ok(())
}
