//! Profile repository for database operations.

use copperleaf_core::UserId;
use sqlx::PgPool;

use crate::models::Profile;
use crate::stores::{ProfileStore, StoreError};

const PROFILE_COLUMNS: &str =
    "user_id, first_name, last_name, phone, email, address, city, state, zip";

/// Repository for shipping profile reads and writes.
#[derive(Debug, Clone)]
pub struct PgProfileStore {
    pool: PgPool,
}

impl PgProfileStore {
    /// Create a new profile repository.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl ProfileStore for PgProfileStore {
    async fn get_by_user(&self, user_id: UserId) -> Result<Option<Profile>, StoreError> {
        let profile = sqlx::query_as::<_, Profile>(&format!(
            "SELECT {PROFILE_COLUMNS} FROM profiles WHERE user_id = $1"
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(profile)
    }

    async fn upsert(&self, profile: &Profile) -> Result<Profile, StoreError> {
        let saved = sqlx::query_as::<_, Profile>(&format!(
            r"
            INSERT INTO profiles (user_id, first_name, last_name, phone, email, address, city, state, zip)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (user_id) DO UPDATE SET
                first_name = EXCLUDED.first_name,
                last_name  = EXCLUDED.last_name,
                phone      = EXCLUDED.phone,
                email      = EXCLUDED.email,
                address    = EXCLUDED.address,
                city       = EXCLUDED.city,
                state      = EXCLUDED.state,
                zip        = EXCLUDED.zip
            RETURNING {PROFILE_COLUMNS}
            "
        ))
        .bind(profile.user_id)
        .bind(&profile.first_name)
        .bind(&profile.last_name)
        .bind(&profile.phone)
        .bind(&profile.email)
        .bind(&profile.address)
        .bind(&profile.city)
        .bind(&profile.state)
        .bind(&profile.zip)
        .fetch_one(&self.pool)
        .await?;

        Ok(saved)
    }
}
