use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use domain::acceptance::AcceptanceSaga;
use domain::issuance::InvitationIssuer;
use domain::role_resolution::RoleResolver;
use persistence::repositories::{
    AuditLogRepository, InvitationRepository, MembershipRepository, OrganizationRepository,
    PgIdentityProvider,
};
use shared::jwt::JwtConfig;

use crate::config::Config;
use crate::middleware::require_user_auth;
use crate::routes::{accept, health, invitations, session};
use crate::services::EmailService;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
    pub jwt: JwtConfig,
    pub email: EmailService,
}

impl AppState {
    pub fn issuer(&self) -> InvitationIssuer {
        InvitationIssuer::new(
            Arc::new(InvitationRepository::new(self.pool.clone())),
            Arc::new(MembershipRepository::new(self.pool.clone())),
            Arc::new(OrganizationRepository::new(self.pool.clone())),
            Arc::new(AuditLogRepository::new(self.pool.clone())),
        )
    }

    pub fn saga(&self) -> AcceptanceSaga {
        AcceptanceSaga::new(
            Arc::new(InvitationRepository::new(self.pool.clone())),
            Arc::new(MembershipRepository::new(self.pool.clone())),
            Arc::new(OrganizationRepository::new(self.pool.clone())),
            Arc::new(PgIdentityProvider::new(self.pool.clone())),
            Arc::new(AuditLogRepository::new(self.pool.clone())),
        )
    }

    pub fn resolver(&self) -> RoleResolver {
        RoleResolver::new(
            Arc::new(MembershipRepository::new(self.pool.clone())),
            Arc::new(OrganizationRepository::new(self.pool.clone())),
        )
    }
}

pub fn create_app(config: Config, pool: PgPool) -> anyhow::Result<Router> {
    let config = Arc::new(config);

    // The JWT key pair is parsed once at startup; a bad key is a boot
    // failure, not a per-request 500.
    let jwt = JwtConfig::with_leeway(
        &config.jwt.private_key,
        &config.jwt.public_key,
        config.jwt.access_token_expiry_secs,
        config.jwt.leeway_secs,
    )
    .map_err(|e| anyhow::anyhow!("Failed to initialize JWT config: {}", e))?;

    let email = EmailService::new(config.email.clone(), config.server.app_base_url.clone());

    let state = AppState {
        pool,
        config: config.clone(),
        jwt,
        email,
    };

    // Build CORS layer based on configuration
    let cors = if config.security.cors_origins.is_empty() {
        // Default: allow any origin (for development)
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        use tower_http::cors::AllowOrigin;
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    // Protected routes (require a user JWT)
    let protected_routes = Router::new()
        .route(
            "/api/v1/organizations/:kind/:org_id/invitations",
            post(invitations::issue_invitation).get(invitations::list_invitations),
        )
        .route(
            "/api/v1/organizations/:kind/:org_id/invitations/bulk",
            post(invitations::issue_invitations_bulk),
        )
        .route(
            "/api/v1/invitations/:invitation_id/resend",
            post(invitations::resend_invitation),
        )
        .route(
            "/api/v1/invitations/:invitation_id",
            delete(invitations::revoke_invitation),
        )
        .route("/api/v1/session/role", get(session::resolve_role))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_user_auth,
        ));

    // Public routes (no authentication required)
    let public_routes = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live))
        .route("/api/v1/invitations/accept", post(accept::accept_invitation));

    Ok(Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        // Global middleware (order matters: bottom layers run first)
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state))
}
