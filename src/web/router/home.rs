use std::collections::HashMap;

use {
    askama::Template,
    axum::{extract::Query, routing::get, Router},
};

use crate::{util::Routes, web::error_code::flash_error};

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub error: Option<&'static str>,
    pub routes: Routes,
}

pub fn router(routes: &Routes) -> Router {
    let home = routes.home.clone();
    let routes = routes.clone();

    Router::new().route(
        &home,
        get(move |Query(params): Query<HashMap<String, String>>| {
            let routes = routes.clone();
            async move {
                IndexTemplate {
                    error: flash_error(&params),
                    routes,
                }
            }
        }),
    )
}
