//! Public invitation acceptance route.
//!
//! The single unauthenticated write endpoint. Turns a one-time invitation
//! secret into an account plus memberships and immediately signs the new
//! user in with an access token.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use tracing::error;
use uuid::Uuid;
use validator::Validate;

use domain::acceptance::AcceptRequest;
use domain::models::OrganizationSummary;

use crate::app::AppState;
use crate::error::ApiError;

#[derive(Debug, Deserialize, Validate)]
pub struct AcceptInvitationRequest {
    #[validate(length(min = 1, message = "Token is required"))]
    pub token: String,

    #[validate(length(min = 8, max = 128, message = "Password must be 8-128 characters"))]
    pub password: String,

    #[validate(length(min = 1, max = 100, message = "First name must be 1-100 characters"))]
    pub first_name: Option<String>,

    #[validate(length(min = 1, max = 100, message = "Last name must be 1-100 characters"))]
    pub last_name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AcceptedUserResponse {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Serialize)]
pub struct OrganizationResponse {
    pub id: Uuid,
    pub name: String,
    pub kind: String,
}

#[derive(Debug, Serialize)]
pub struct AcceptInvitationResponse {
    pub user: AcceptedUserResponse,
    pub organization: Option<OrganizationResponse>,
    pub role: String,
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

fn organization_response(summary: OrganizationSummary) -> OrganizationResponse {
    OrganizationResponse {
        id: summary.id,
        name: summary.name,
        kind: summary.kind.to_string(),
    }
}

/// POST /api/v1/invitations/accept
pub async fn accept_invitation(
    State(state): State<AppState>,
    Json(request): Json<AcceptInvitationRequest>,
) -> Result<impl IntoResponse, ApiError> {
    request.validate()?;

    let account = state
        .saga()
        .accept(AcceptRequest {
            secret: request.token,
            password: request.password,
            first_name: request.first_name,
            last_name: request.last_name,
        })
        .await?;

    // The account is committed at this point; a token-signing failure is
    // an internal fault, not a reason to pretend the acceptance failed.
    let (access_token, _jti) = state.jwt.generate_access_token(account.user_id).map_err(|err| {
        error!(user_id = %account.user_id, error = %err, "Access token generation failed");
        ApiError::Internal("Failed to issue access token".to_string())
    })?;

    let response = AcceptInvitationResponse {
        user: AcceptedUserResponse {
            id: account.user_id,
            email: account.email,
            first_name: account.first_name,
            last_name: account.last_name,
        },
        organization: account.organization.map(organization_response),
        role: account.invitation.role.to_string(),
        access_token,
        token_type: "Bearer".to_string(),
        expires_in: state.jwt.access_token_expiry_secs,
    };

    Ok((StatusCode::CREATED, Json(response)))
}
