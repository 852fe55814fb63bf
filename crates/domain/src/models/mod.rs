//! Domain models.

pub mod audit;
pub mod invitation;
pub mod membership;
pub mod organization;
pub mod role;

pub use audit::{AuditAction, AuditEntry, NewAuditEntry};
pub use invitation::{
    Invitation, InvitationStatus, InviteRole, NewInvitation, ISSUE_EXPIRY_DAYS,
    MAX_BULK_ERRORS, RESEND_EXPIRY_HOURS,
};
pub use membership::{
    AdminPrivilege, AssociationManagerRecord, CompanyRole, MemberRecord, NewAssociationManager,
    NewMember,
};
pub use organization::{OrgKind, OrgRef, OrganizationSummary};
pub use role::{ResolvedRole, RoleHint, RoleKind};
