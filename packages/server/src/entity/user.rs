use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
    pub email: String,
    #[sea_orm(unique)]
    pub username: Option<String>,

    /// NULL for OAuth-only accounts.
    pub password_hash: Option<String>,

    /// "google" or "microsoft" for OAuth accounts.
    pub oauth_provider: Option<String>,
    /// Provider-side account identifier.
    pub oauth_subject: Option<String>,

    pub is_active: bool,
    pub is_verified: bool,

    #[sea_orm(has_one)]
    pub profile: HasOne<super::user_profile::Entity>,

    #[sea_orm(has_many)]
    pub submissions: HasMany<super::challenge_submission::Entity>,

    #[sea_orm(has_many)]
    pub scores: HasMany<super::score::Entity>,

    #[sea_orm(has_many, via = "season_member")]
    pub seasons: HasMany<super::season::Entity>,

    #[sea_orm(has_many, via = "user_badge")]
    pub badges: HasMany<super::badge::Entity>,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
    pub last_login_at: Option<DateTimeUtc>,
}

impl ActiveModelBehavior for ActiveModel {}
