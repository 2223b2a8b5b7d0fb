use rand::Rng;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter};

use crate::entity::season;
use crate::error::AppError;

/// Invitation codes avoid characters that read ambiguously when shared aloud
/// or scribbled on paper (0/O, 1/I/L).
const ALPHABET: &[u8] = b"ABCDEFGHJKMNPQRSTUVWXYZ23456789";

pub const CODE_LENGTH: usize = 6;

/// Attempts before giving up on finding a free code.
const MAX_ATTEMPTS: usize = 16;

/// Generate one random candidate code.
pub fn generate_code() -> String {
    let mut rng = rand::rng();
    (0..CODE_LENGTH)
        .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
        .collect()
}

/// Allocate an invitation code not currently used by any season.
///
/// The lookup keeps collisions rare; the unique constraint on
/// `season.invitation_code` is the correctness backstop, and the caller retries
/// on a constraint violation at insert time.
pub async fn allocate_code<C: ConnectionTrait>(db: &C) -> Result<String, AppError> {
    for _ in 0..MAX_ATTEMPTS {
        let code = generate_code();
        let taken = season::Entity::find()
            .filter(season::Column::InvitationCode.eq(&code))
            .one(db)
            .await?
            .is_some();
        if !taken {
            return Ok(code);
        }
    }
    Err(AppError::Internal(
        "Could not allocate a unique invitation code".into(),
    ))
}
