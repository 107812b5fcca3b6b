use {askama::Template, axum::response::Response};

use askama_axum::IntoResponse;

use crate::{
    central_auth::AuthRequest, model::User, util::Routes, web::error_code::flash_error,
};

#[derive(Template)]
#[template(path = "profile.html")]
pub struct ProfileTemplate {
    pub user: User,
    pub success: bool,
    pub error: Option<&'static str>,
    pub routes: Routes,
}

/// The banners a profile page shows, read from the query string before the request is handed
/// to the auth client.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProfileFlash {
    pub success: bool,
    pub error: Option<&'static str>,
}

impl ProfileFlash {
    pub fn from_request(request: &AuthRequest) -> Self {
        Self {
            success: request.param("success").is_some(),
            error: flash_error(&request.params),
        }
    }

    pub fn render(self, user: User, routes: Routes) -> Response {
        ProfileTemplate {
            user,
            success: self.success,
            error: self.error,
            routes,
        }
        .into_response()
    }
}
