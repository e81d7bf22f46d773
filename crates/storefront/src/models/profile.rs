//! User shipping profile model.

use copperleaf_core::UserId;
use serde::{Deserialize, Serialize};

/// A user's shipping identity.
///
/// At most one profile exists per user; checkout requires one and copies
/// its address fields into the order header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Profile {
    pub user_id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip: String,
}

/// Profile fields accepted from a client.
///
/// The user id never comes from the request body; it is supplied by the
/// resolved identity.
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileUpdate {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip: String,
}

impl ProfileUpdate {
    /// Attach the resolved user id to the submitted fields.
    #[must_use]
    pub fn into_profile(self, user_id: UserId) -> Profile {
        Profile {
            user_id,
            first_name: self.first_name,
            last_name: self.last_name,
            phone: self.phone,
            email: self.email,
            address: self.address,
            city: self.city,
            state: self.state,
            zip: self.zip,
        }
    }
}
