// ── Route guards ──
//
// View-access predicates. Evaluation is pure and cached nowhere: callers
// re-run it on every session-state change, so a logout while a guarded
// view is active redirects on the next pass.

use crate::session::SessionState;

/// Who may enter a guarded view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessPolicy {
    /// Any authenticated user.
    Authenticated,
    /// Authenticated users with the admin flag.
    Admin,
}

/// Where a denied navigation should land.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Redirect {
    /// Send to the login view, recording the attempted route so a
    /// successful login can return there.
    Login { return_to: String },
    /// Send home (authenticated but not authorized).
    Home,
}

/// Result of evaluating a guard against the current session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardOutcome {
    /// The session is still bootstrapping -- show a loading indicator,
    /// do not redirect yet.
    Checking,
    /// Render the guarded view.
    Allowed,
    /// Redirect away.
    Denied(Redirect),
}

/// Evaluate `policy` against `session` for a navigation to `attempted`.
pub fn evaluate(policy: AccessPolicy, session: &SessionState, attempted: &str) -> GuardOutcome {
    if session.loading {
        return GuardOutcome::Checking;
    }

    let Some(ref user) = session.user else {
        return GuardOutcome::Denied(Redirect::Login {
            return_to: attempted.to_owned(),
        });
    };

    if policy == AccessPolicy::Admin && !user.is_admin {
        return GuardOutcome::Denied(Redirect::Home);
    }

    GuardOutcome::Allowed
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use findit_api::UserRecord;

    fn user(is_admin: bool) -> UserRecord {
        UserRecord {
            id: 1,
            username: "sam".into(),
            email: "sam@example.com".into(),
            is_admin,
            created_at: Utc::now(),
        }
    }

    fn session(user: Option<UserRecord>, loading: bool) -> SessionState {
        SessionState {
            user,
            loading,
            last_error: None,
        }
    }

    #[test]
    fn loading_session_is_checking_not_denied() {
        let s = session(None, true);
        assert_eq!(
            evaluate(AccessPolicy::Authenticated, &s, "/dashboard"),
            GuardOutcome::Checking
        );
        assert_eq!(evaluate(AccessPolicy::Admin, &s, "/admin"), GuardOutcome::Checking);
    }

    #[test]
    fn anonymous_user_is_sent_to_login_with_return_path() {
        let s = session(None, false);
        assert_eq!(
            evaluate(AccessPolicy::Authenticated, &s, "/dashboard"),
            GuardOutcome::Denied(Redirect::Login {
                return_to: "/dashboard".into()
            })
        );
        assert_eq!(
            evaluate(AccessPolicy::Admin, &s, "/admin"),
            GuardOutcome::Denied(Redirect::Login {
                return_to: "/admin".into()
            })
        );
    }

    #[test]
    fn non_admin_is_sent_home_from_admin_views() {
        let s = session(Some(user(false)), false);
        assert_eq!(
            evaluate(AccessPolicy::Admin, &s, "/admin"),
            GuardOutcome::Denied(Redirect::Home)
        );
        // ...but may enter plain authenticated views.
        assert_eq!(
            evaluate(AccessPolicy::Authenticated, &s, "/dashboard"),
            GuardOutcome::Allowed
        );
    }

    #[test]
    fn admin_passes_both_policies() {
        let s = session(Some(user(true)), false);
        assert_eq!(evaluate(AccessPolicy::Admin, &s, "/admin"), GuardOutcome::Allowed);
        assert_eq!(
            evaluate(AccessPolicy::Authenticated, &s, "/dashboard"),
            GuardOutcome::Allowed
        );
    }

    #[test]
    fn logout_flips_a_previously_allowed_guard() {
        let mut s = session(Some(user(false)), false);
        assert_eq!(
            evaluate(AccessPolicy::Authenticated, &s, "/dashboard"),
            GuardOutcome::Allowed
        );

        s.user = None;
        assert!(matches!(
            evaluate(AccessPolicy::Authenticated, &s, "/dashboard"),
            GuardOutcome::Denied(Redirect::Login { .. })
        ));
    }
}
