//! Access policy: render-or-redirect decisions for guarded views.
//!
//! Pure functions of the session state and the route's requirements; no
//! store access and no side effects. HTTP handlers translate the
//! decisions into silent redirects via [`AppError`].

use crate::models::{Role, UserProfile};
use crate::utils::error::AppError;

/// What is known about the caller at evaluation time. `Loading` covers
/// both an unresolved session and a session whose profile row has not
/// been fetched yet; evaluating role checks against a half-loaded caller
/// must never grant or deny anything.
#[derive(Debug, Clone, Copy)]
pub enum SessionState<'a> {
    Loading,
    Anonymous,
    Authenticated(&'a UserProfile),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    /// Show the view.
    Render,
    /// No session on an auth-required view.
    RedirectToSignIn,
    /// Authenticated, but the role is not in the allow-list.
    RedirectToDashboard,
    /// Session or profile still resolving; show a loading state, not a
    /// decision.
    Pending,
}

/// Decide whether a view renders for this caller.
///
/// Deterministic and idempotent: same inputs, same decision. When
/// `allowed_roles` is given but the caller is anonymous on a view that
/// does not require auth, the view renders; role checks only apply once
/// a profile is known.
pub fn evaluate(
    session: SessionState<'_>,
    require_auth: bool,
    allowed_roles: Option<&[Role]>,
) -> AccessDecision {
    let profile = match session {
        SessionState::Loading => return AccessDecision::Pending,
        SessionState::Anonymous => None,
        SessionState::Authenticated(profile) => Some(profile),
    };

    if require_auth && profile.is_none() {
        return AccessDecision::RedirectToSignIn;
    }

    match (profile, allowed_roles) {
        (Some(profile), Some(allowed)) if !allowed.contains(&profile.role) => {
            AccessDecision::RedirectToDashboard
        }
        _ => AccessDecision::Render,
    }
}

/// Handler-side bridge: the profile is already resolved, so `Loading`
/// cannot occur; a disallowed role becomes the silent dashboard redirect.
pub fn require_role(profile: &UserProfile, allowed: &[Role]) -> Result<(), AppError> {
    match evaluate(SessionState::Authenticated(profile), true, Some(allowed)) {
        AccessDecision::Render => Ok(()),
        AccessDecision::RedirectToDashboard => Err(AppError::NotAuthorized),
        AccessDecision::RedirectToSignIn | AccessDecision::Pending => {
            Err(AppError::NotAuthenticated)
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use uuid::Uuid;

    use super::*;
    use crate::models::SellerStatus;

    fn profile_with_role(role: Role) -> UserProfile {
        let now = Utc::now();
        UserProfile {
            id: Uuid::new_v4(),
            email: "person@example.com".to_string(),
            full_name: None,
            role,
            seller_status: SellerStatus::None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn anonymous_on_auth_required_view_redirects_to_sign_in() {
        let decision = evaluate(SessionState::Anonymous, true, None);
        assert_eq!(decision, AccessDecision::RedirectToSignIn);

        // Role arguments change nothing for an anonymous caller.
        let decision = evaluate(SessionState::Anonymous, true, Some(&[Role::Admin]));
        assert_eq!(decision, AccessDecision::RedirectToSignIn);
    }

    #[test]
    fn loading_is_always_pending() {
        assert_eq!(evaluate(SessionState::Loading, true, None), AccessDecision::Pending);
        assert_eq!(evaluate(SessionState::Loading, false, None), AccessDecision::Pending);
        assert_eq!(
            evaluate(SessionState::Loading, true, Some(&[Role::Admin])),
            AccessDecision::Pending
        );
    }

    #[test]
    fn disallowed_role_redirects_to_dashboard() {
        let profile = profile_with_role(Role::User);
        let decision = evaluate(
            SessionState::Authenticated(&profile),
            true,
            Some(&[Role::Seller, Role::Admin]),
        );
        assert_eq!(decision, AccessDecision::RedirectToDashboard);
    }

    #[test]
    fn allowed_role_renders() {
        let profile = profile_with_role(Role::Admin);
        let decision = evaluate(
            SessionState::Authenticated(&profile),
            true,
            Some(&[Role::Admin]),
        );
        assert_eq!(decision, AccessDecision::Render);
    }

    #[test]
    fn authenticated_view_without_role_list_renders() {
        let profile = profile_with_role(Role::User);
        let decision = evaluate(SessionState::Authenticated(&profile), true, None);
        assert_eq!(decision, AccessDecision::Render);
    }

    #[test]
    fn public_view_renders_for_anonymous_caller() {
        assert_eq!(evaluate(SessionState::Anonymous, false, None), AccessDecision::Render);
    }

    #[test]
    fn evaluation_is_idempotent() {
        let profile = profile_with_role(Role::Seller);
        let first = evaluate(SessionState::Authenticated(&profile), true, Some(&[Role::Seller]));
        let second = evaluate(SessionState::Authenticated(&profile), true, Some(&[Role::Seller]));
        assert_eq!(first, second);
    }

    #[test]
    fn require_role_maps_to_errors() {
        let user = profile_with_role(Role::User);
        assert!(matches!(
            require_role(&user, &[Role::Admin]),
            Err(AppError::NotAuthorized)
        ));
        let admin = profile_with_role(Role::Admin);
        assert!(require_role(&admin, &[Role::Admin]).is_ok());
    }
}
