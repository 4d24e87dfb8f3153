use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::repo_types::User;

#[derive(Debug, Serialize)]
pub struct PublicUser {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub profile_banner: Option<String>,
}

impl From<User> for PublicUser {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            username: u.username,
            email: u.email,
            profile_banner: u.profile_banner,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BannerResponse {
    pub profile_banner: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateUserRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    /// Required alongside `password`.
    pub confirm_password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateEmailRequest {
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePasswordRequest {
    pub password: String,
    pub confirm_password: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateBannerRequest {
    #[serde(alias = "banner_link")]
    pub profile_banner: String,
}
