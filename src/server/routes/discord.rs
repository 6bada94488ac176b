//! Discord proxy endpoints

use super::errors;
use crate::server::AppState;
use actix_web::{HttpResponse, web};
use tracing::error;

/// Configure Discord routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/discord").route("/profile", web::get().to(profile)));
}

/// Profile of the configured Discord user
pub async fn profile(state: web::Data<AppState>) -> HttpResponse {
    let dev_mode = state.config.server.dev_mode;

    let (bot_token, user_id) = match state.config.discord.credentials() {
        Ok(creds) => creds,
        Err(err) => {
            return errors::error_response(&err, "Failed to fetch Discord profile", dev_mode);
        }
    };

    match state.discord.profile(&bot_token, &user_id).await {
        Ok(profile) => HttpResponse::Ok().json(profile),
        Err(err) => {
            error!("Discord API error: {}", err);
            errors::error_response(&err, "Failed to fetch Discord profile", dev_mode)
        }
    }
}
