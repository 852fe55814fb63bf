//! Common validation utilities.

use validator::ValidationError;

/// Minimum password length for newly provisioned accounts.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Maximum password length for newly provisioned accounts.
pub const MAX_PASSWORD_LENGTH: usize = 128;

/// Validates a role value granted through an invitation.
pub fn validate_invite_role(role: &str) -> Result<(), ValidationError> {
    match role {
        "owner" | "admin" | "member" | "manager" => Ok(()),
        _ => {
            let mut err = ValidationError::new("invalid_role");
            err.message = Some("Role must be 'owner', 'admin', 'member' or 'manager'".into());
            Err(err)
        }
    }
}

/// Validates an organization kind path/body value.
pub fn validate_organization_kind(kind: &str) -> Result<(), ValidationError> {
    match kind {
        "company" | "association" => Ok(()),
        _ => {
            let mut err = ValidationError::new("invalid_organization_kind");
            err.message = Some("Organization kind must be 'company' or 'association'".into());
            Err(err)
        }
    }
}
