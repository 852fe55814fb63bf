//! Invitation lifecycle routes.
//!
//! Issue, bulk-issue, resend, revoke and list invitations for an
//! organization. All routes require an authenticated user; privilege over
//! the target organization is enforced in the domain layer against live
//! membership data.

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;
use validator::Validate;

use domain::issuance::{IssueRequest, IssuedInvitation};
use domain::models::{Invitation, OrgKind, OrgRef};

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::UserAuth;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct IssueInvitationRequest {
    #[validate(
        email(message = "Invalid email address"),
        length(max = 255, message = "Email must be at most 255 characters")
    )]
    pub email: String,

    #[validate(length(min = 1, max = 100, message = "First name must be 1-100 characters"))]
    pub first_name: String,

    #[validate(length(min = 1, max = 100, message = "Last name must be 1-100 characters"))]
    pub last_name: String,

    #[validate(custom(function = "shared::validation::validate_invite_role"))]
    pub role: String,

    #[validate(length(max = 100, message = "Designation must be at most 100 characters"))]
    pub designation: Option<String>,

    #[validate(length(max = 100, message = "Department must be at most 100 characters"))]
    pub department: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct BulkIssueRequest {
    #[validate(length(min = 1, max = 500, message = "Between 1 and 500 rows per request"))]
    pub invitations: Vec<IssueInvitationRequest>,
}

/// Invitation representation without the secret.
#[derive(Debug, Serialize)]
pub struct InvitationResponse {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub organization_id: Uuid,
    pub organization_kind: String,
    pub role: String,
    pub status: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl InvitationResponse {
    fn from_invitation(invitation: &Invitation) -> Self {
        Self {
            id: invitation.id,
            email: invitation.email.clone(),
            first_name: invitation.first_name.clone(),
            last_name: invitation.last_name.clone(),
            organization_id: invitation.organization.id,
            organization_kind: invitation.organization.kind.to_string(),
            role: invitation.role.to_string(),
            // Expiry is derived at read time; the store never holds it.
            status: invitation.effective_status(Utc::now()).to_string(),
            expires_at: invitation.expires_at,
            created_at: invitation.created_at,
        }
    }
}

/// Response for a freshly issued or resent invitation. The token appears
/// here exactly once and is never retrievable again.
#[derive(Debug, Serialize)]
pub struct IssuedInvitationResponse {
    #[serde(flatten)]
    pub invitation: InvitationResponse,
    pub token: String,
    pub invite_url: String,
    pub notification_sent: bool,
}

#[derive(Debug, Serialize)]
pub struct BulkIssueResponse {
    pub succeeded: usize,
    pub failed: usize,
    pub errors: Vec<String>,
    pub invitations: Vec<IssuedInvitationResponse>,
}

#[derive(Debug, Serialize)]
pub struct ListInvitationsResponse {
    pub invitations: Vec<InvitationResponse>,
    pub total: usize,
}

fn parse_org(kind: &str, org_id: Uuid) -> Result<OrgRef, ApiError> {
    let kind: OrgKind = kind.parse().map_err(ApiError::Validation)?;
    Ok(OrgRef { id: org_id, kind })
}

fn to_issue_request(request: IssueInvitationRequest, org: OrgRef) -> Result<IssueRequest, ApiError> {
    Ok(IssueRequest {
        email: request.email,
        first_name: request.first_name,
        last_name: request.last_name,
        organization: org,
        role: request.role.parse().map_err(ApiError::Validation)?,
        designation: request.designation,
        department: request.department,
    })
}

/// Sends the invitation email, reporting delivery as a flag rather than a
/// failure; the invitation itself is already committed.
async fn notify(state: &AppState, issued: &IssuedInvitation) -> bool {
    let result = state
        .email
        .send_invitation_email(
            &issued.invitation.email,
            &issued.invitation.first_name,
            &issued.organization.name,
            &issued.secret,
        )
        .await;

    if let Err(err) = &result {
        warn!(
            invitation_id = %issued.invitation.id,
            error = %err,
            "Invitation email delivery failed"
        );
    }
    result.is_ok()
}

fn issued_response(issued: IssuedInvitation, state: &AppState, notification_sent: bool) -> IssuedInvitationResponse {
    IssuedInvitationResponse {
        invitation: InvitationResponse::from_invitation(&issued.invitation),
        invite_url: state.email.invite_url(&issued.secret),
        token: issued.secret,
        notification_sent,
    }
}

/// POST /api/v1/organizations/:kind/:org_id/invitations
pub async fn issue_invitation(
    State(state): State<AppState>,
    Extension(auth): Extension<UserAuth>,
    Path((kind, org_id)): Path<(String, Uuid)>,
    Json(request): Json<IssueInvitationRequest>,
) -> Result<impl IntoResponse, ApiError> {
    request.validate()?;
    let org = parse_org(&kind, org_id)?;

    let issued = state
        .issuer()
        .issue(to_issue_request(request, org)?, auth.user_id)
        .await?;

    let notification_sent = notify(&state, &issued).await;
    let response = issued_response(issued, &state, notification_sent);

    Ok((StatusCode::CREATED, Json(response)))
}

/// POST /api/v1/organizations/:kind/:org_id/invitations/bulk
pub async fn issue_invitations_bulk(
    State(state): State<AppState>,
    Extension(auth): Extension<UserAuth>,
    Path((kind, org_id)): Path<(String, Uuid)>,
    Json(request): Json<BulkIssueRequest>,
) -> Result<impl IntoResponse, ApiError> {
    request.validate()?;
    let org = parse_org(&kind, org_id)?;

    // Malformed rows are a request-shape problem and fail the whole call;
    // per-row business failures below are isolated by the issuer.
    let mut rows = Vec::with_capacity(request.invitations.len());
    for row in request.invitations {
        row.validate()?;
        rows.push(to_issue_request(row, org)?);
    }

    let outcome = state.issuer().issue_bulk(rows, auth.user_id).await?;

    let mut invitations = Vec::with_capacity(outcome.issued.len());
    for issued in outcome.issued {
        let notification_sent = notify(&state, &issued).await;
        invitations.push(issued_response(issued, &state, notification_sent));
    }

    let response = BulkIssueResponse {
        succeeded: outcome.succeeded,
        failed: outcome.failed,
        errors: outcome.errors,
        invitations,
    };

    Ok((StatusCode::CREATED, Json(response)))
}

/// POST /api/v1/invitations/:invitation_id/resend
pub async fn resend_invitation(
    State(state): State<AppState>,
    Extension(auth): Extension<UserAuth>,
    Path(invitation_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let issued = state.issuer().resend(invitation_id, auth.user_id).await?;

    let notification_sent = notify(&state, &issued).await;
    let response = issued_response(issued, &state, notification_sent);

    Ok(Json(response))
}

/// DELETE /api/v1/invitations/:invitation_id
pub async fn revoke_invitation(
    State(state): State<AppState>,
    Extension(auth): Extension<UserAuth>,
    Path(invitation_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state.issuer().revoke(invitation_id, auth.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/organizations/:kind/:org_id/invitations
pub async fn list_invitations(
    State(state): State<AppState>,
    Extension(auth): Extension<UserAuth>,
    Path((kind, org_id)): Path<(String, Uuid)>,
) -> Result<impl IntoResponse, ApiError> {
    let org = parse_org(&kind, org_id)?;

    let invitations = state.issuer().list(org, auth.user_id).await?;
    let invitations: Vec<InvitationResponse> = invitations
        .iter()
        .map(InvitationResponse::from_invitation)
        .collect();

    let response = ListInvitationsResponse {
        total: invitations.len(),
        invitations,
    };

    Ok(Json(response))
}
