use crate::models::{Role, VisibilitySetting};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageAction {
    View,
    Create,
    Edit,
    Delete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    /// Actor has no enrollment in the course (401).
    NotEnrolled,
    /// Actor's role is too low for the action (401).
    InsufficientRole,
    /// The addressed page does not exist (404).
    NotFound,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(DenyReason),
}

/// Decides whether an actor may perform `action` on a page with the given
/// visibility (`None` = the page does not exist). Inputs arrive already
/// validated; the rules are applied strictly in order:
///
/// 1. no enrollment denies everything;
/// 2. Create/Edit/Delete need at least Assistant;
/// 3. a Hidden page is invisible to Students only;
/// 4. a missing page is NotFound for View/Edit/Delete.
pub fn decide(
    actor_role: Option<Role>,
    action: PageAction,
    visibility: Option<VisibilitySetting>,
) -> Decision {
    let Some(role) = actor_role else {
        return Decision::Deny(DenyReason::NotEnrolled);
    };

    let is_write = matches!(
        action,
        PageAction::Create | PageAction::Edit | PageAction::Delete
    );
    if is_write && role < Role::Assistant {
        return Decision::Deny(DenyReason::InsufficientRole);
    }

    if action == PageAction::View
        && visibility == Some(VisibilitySetting::Hidden)
        && role == Role::Student
    {
        return Decision::Deny(DenyReason::InsufficientRole);
    }

    if action != PageAction::Create && visibility.is_none() {
        return Decision::Deny(DenyReason::NotFound);
    }

    Decision::Allow
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_ROLES: [Role; 3] = [Role::Student, Role::Assistant, Role::Professor];
    const WRITE_ACTIONS: [PageAction; 3] =
        [PageAction::Create, PageAction::Edit, PageAction::Delete];

    #[test]
    fn no_enrollment_denies_every_action() {
        for action in [
            PageAction::View,
            PageAction::Create,
            PageAction::Edit,
            PageAction::Delete,
        ] {
            assert_eq!(
                decide(None, action, Some(VisibilitySetting::Listed)),
                Decision::Deny(DenyReason::NotEnrolled)
            );
        }
    }

    #[test]
    fn students_never_write() {
        for action in WRITE_ACTIONS {
            assert_eq!(
                decide(Some(Role::Student), action, Some(VisibilitySetting::Listed)),
                Decision::Deny(DenyReason::InsufficientRole)
            );
        }
    }

    #[test]
    fn grants_are_monotonic_in_role() {
        // If a role is granted an action, every higher role is granted it too.
        for action in WRITE_ACTIONS {
            for vis in [
                Some(VisibilitySetting::Hidden),
                Some(VisibilitySetting::Unlisted),
                Some(VisibilitySetting::Listed),
            ] {
                let mut granted_below = false;
                for role in ALL_ROLES {
                    let allowed = decide(Some(role), action, vis) == Decision::Allow;
                    assert!(
                        !granted_below || allowed,
                        "{:?} allowed below but denied at {:?}",
                        action,
                        role
                    );
                    granted_below = allowed;
                }
            }
        }
    }

    #[test]
    fn hidden_page_view_is_denied_to_students_only() {
        assert_eq!(
            decide(
                Some(Role::Student),
                PageAction::View,
                Some(VisibilitySetting::Hidden)
            ),
            Decision::Deny(DenyReason::InsufficientRole)
        );
        for role in [Role::Assistant, Role::Professor] {
            assert_eq!(
                decide(Some(role), PageAction::View, Some(VisibilitySetting::Hidden)),
                Decision::Allow
            );
        }
    }

    #[test]
    fn missing_page_is_not_found_after_role_checks() {
        assert_eq!(
            decide(Some(Role::Professor), PageAction::View, None),
            Decision::Deny(DenyReason::NotFound)
        );
        assert_eq!(
            decide(Some(Role::Professor), PageAction::Delete, None),
            Decision::Deny(DenyReason::NotFound)
        );
        // Rule order: a Student editing a missing page fails on role first.
        assert_eq!(
            decide(Some(Role::Student), PageAction::Edit, None),
            Decision::Deny(DenyReason::InsufficientRole)
        );
    }

    #[test]
    fn listed_and_unlisted_pages_are_viewable_by_all_roles() {
        for role in ALL_ROLES {
            for vis in [VisibilitySetting::Unlisted, VisibilitySetting::Listed] {
                assert_eq!(
                    decide(Some(role), PageAction::View, Some(vis)),
                    Decision::Allow
                );
            }
        }
    }
}
