use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

impl MessageResponse {
    pub fn new(message: &'static str) -> Json<Self> {
        Json(Self { message })
    }
}

/// `201 Created` with a `Location` header and a `{message, id}` body.
#[derive(Debug, Serialize)]
pub struct Created {
    pub message: &'static str,
    pub id: Uuid,
    #[serde(skip)]
    location: String,
}

impl Created {
    pub fn new(message: &'static str, id: Uuid, location: String) -> Self {
        Self {
            message,
            id,
            location,
        }
    }
}

impl IntoResponse for Created {
    fn into_response(self) -> Response {
        let location = HeaderValue::from_str(&self.location).ok();
        let mut res = (StatusCode::CREATED, Json(&self)).into_response();
        if let Some(value) = location {
            res.headers_mut().insert(header::LOCATION, value);
        }
        res
    }
}
