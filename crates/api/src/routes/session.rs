//! Session role resolution route.
//!
//! Reports the effective role for the authenticated user, optionally
//! narrowed by a client-supplied hint. The hint is advisory only; it is
//! always checked against real membership rows before anything is granted.

use axum::{
    extract::{Extension, Query, State},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use domain::models::{ResolvedRole, RoleHint, RoleKind};

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::UserAuth;

#[derive(Debug, Default, Deserialize)]
pub struct RoleQuery {
    pub role: Option<String>,
    pub organization_id: Option<Uuid>,
}

impl RoleQuery {
    fn into_hint(self) -> Result<RoleHint, ApiError> {
        let role = match self.role {
            Some(raw) => Some(raw.parse::<RoleKind>().map_err(ApiError::Validation)?),
            None => None,
        };
        Ok(RoleHint {
            role,
            organization_id: self.organization_id,
        })
    }
}

/// GET /api/v1/session/role
pub async fn resolve_role(
    State(state): State<AppState>,
    Extension(auth): Extension<UserAuth>,
    Query(query): Query<RoleQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let hint = query.into_hint()?;
    let role: ResolvedRole = state.resolver().resolve(auth.user_id, hint).await?;
    Ok(Json(role))
}
