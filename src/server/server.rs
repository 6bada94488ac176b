//! HTTP server core implementation
//!
//! Owns the request pipeline: CORS, security headers, development-mode
//! request logging, the two rate limiters (LastFM-scoped first, then
//! general), the request deadline, and finally the proxy routes.

use crate::config::Config;
use crate::core::rate_limiter::SlidingWindowLimiter;
use crate::core::upstream::{DiscordClient, LastfmClient};
use crate::server::handlers;
use crate::server::middleware::{
    RateLimitMiddleware, SecurityHeadersMiddleware, TimeoutMiddleware,
};
use crate::server::routes;
use crate::server::state::AppState;
use crate::utils::error::{GatewayError, Result, json_error_handler, query_error_handler};
use actix_cors::Cors;
use actix_web::middleware::Condition;
use actix_web::{App, HttpServer as ActixHttpServer, web};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_actix_web::TracingLogger;

/// HTTP server
pub struct HttpServer {
    state: AppState,
    lastfm_limiter: SlidingWindowLimiter,
    general_limiter: SlidingWindowLimiter,
}

impl HttpServer {
    /// Create a new HTTP server from configuration
    pub fn new(config: Config) -> Result<Self> {
        let config = Arc::new(config);

        let http = reqwest::Client::builder().build()?;
        let lastfm = LastfmClient::new(http.clone(), config.lastfm.api_base.clone());
        let discord = DiscordClient::new(http, config.discord.api_base.clone());

        // One limiter instance per policy, shared across all workers
        let lastfm_limiter = SlidingWindowLimiter::new(config.rate_limit.lastfm.clone());
        let general_limiter = SlidingWindowLimiter::new(config.rate_limit.general.clone());

        let state = AppState::new(config, lastfm, discord);

        Ok(Self {
            state,
            lastfm_limiter,
            general_limiter,
        })
    }

    /// Create the Actix-web application
    ///
    /// Middleware executes top to bottom as listed in the pipeline doc above;
    /// actix applies `wrap` calls in reverse registration order, hence the
    /// ordering here.
    pub(crate) fn create_app(
        state: web::Data<AppState>,
        lastfm_limiter: SlidingWindowLimiter,
        general_limiter: SlidingWindowLimiter,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        let timeout = Duration::from_millis(state.config.server.timeout_ms);
        let dev_mode = state.config.server.dev_mode;
        let max_body_size = state.config.server.max_body_size;

        App::new()
            .app_data(state)
            .app_data(
                web::JsonConfig::default()
                    .limit(max_body_size)
                    .error_handler(json_error_handler),
            )
            .app_data(web::QueryConfig::default().error_handler(query_error_handler))
            .wrap(TimeoutMiddleware::new(timeout))
            .wrap(RateLimitMiddleware::new(general_limiter))
            .wrap(RateLimitMiddleware::scoped("/lastfm", lastfm_limiter))
            .wrap(Condition::new(dev_mode, TracingLogger::default()))
            .wrap(SecurityHeadersMiddleware)
            .wrap(Cors::permissive())
            .route("/", web::get().to(handlers::index))
            .route("/health", web::get().to(handlers::health_check))
            .configure(routes::lastfm::configure_routes)
            .configure(routes::discord::configure_routes)
            .default_service(web::route().to(handlers::not_found))
    }

    /// Build an application instance over this server's shared state
    #[cfg(test)]
    pub(crate) fn app(
        &self,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody + use<>>,
            Error = actix_web::Error,
            InitError = (),
        > + use<>,
    > {
        Self::create_app(
            web::Data::new(self.state.clone()),
            self.lastfm_limiter.clone(),
            self.general_limiter.clone(),
        )
    }

    /// Start the HTTP server
    pub async fn start(self) -> Result<()> {
        let addr = self.state.config.server.address();
        info!("Starting HTTP server on {}", addr);

        self.lastfm_limiter.start_cleanup_task();
        self.general_limiter.start_cleanup_task();

        let state = web::Data::new(self.state);
        let lastfm_limiter = self.lastfm_limiter;
        let general_limiter = self.general_limiter;

        let server = ActixHttpServer::new(move || {
            Self::create_app(
                state.clone(),
                lastfm_limiter.clone(),
                general_limiter.clone(),
            )
        })
        .bind(&addr)
        .map_err(|e| GatewayError::Server(format!("Failed to bind {}: {}", addr, e)))?
        .run();

        info!("HTTP server listening on {}", addr);

        server
            .await
            .map_err(|e| GatewayError::Server(format!("Server error: {}", e)))?;

        info!("HTTP server stopped");
        Ok(())
    }
}
