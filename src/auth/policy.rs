//! Role Policy
//!
//! One function decides which console surfaces a role may open. The
//! route gate and the navigation sidebar both consult it, so a link
//! never appears that the gate would bounce.

use crate::model::Role;

/// The gated console surfaces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    /// Overview dashboard with platform counts
    Dashboard,
    /// Tenant management (platform staff only)
    Organizations,
    Users,
    Courses,
    Content,
    Quizzes,
    LiveSessions,
    /// Landing-page banners and blog posts
    Marketing,
    Coupons,
    FeatureFlags,
    Notifications,
    Omr,
}

impl Surface {
    pub fn all() -> [Surface; 12] {
        [
            Self::Dashboard,
            Self::Organizations,
            Self::Users,
            Self::Courses,
            Self::Content,
            Self::Quizzes,
            Self::LiveSessions,
            Self::Marketing,
            Self::Coupons,
            Self::FeatureFlags,
            Self::Notifications,
            Self::Omr,
        ]
    }
}

/// Whether a role may open a surface
pub fn can_access(role: Role, surface: Surface) -> bool {
    match role {
        Role::SuperAdmin => true,
        Role::OrgAdmin => matches!(
            surface,
            Surface::Dashboard
                | Surface::Users
                | Surface::Courses
                | Surface::Content
                | Surface::Quizzes
                | Surface::LiveSessions
                | Surface::Notifications
                | Surface::Omr
        ),
        Role::Teacher => matches!(
            surface,
            Surface::Courses | Surface::Content | Surface::Quizzes | Surface::LiveSessions
        ),
        // Students use the learner apps, never this console
        Role::Student => false,
    }
}

/// The first surface a role should land on after sign-in
pub fn home_surface(role: Role) -> Option<Surface> {
    Surface::all().into_iter().find(|s| can_access(role, *s))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_super_admin_sees_everything() {
        for surface in Surface::all() {
            assert!(can_access(Role::SuperAdmin, surface));
        }
    }

    #[test]
    fn test_org_admin_is_scoped_to_tenant_surfaces() {
        assert!(can_access(Role::OrgAdmin, Surface::Users));
        assert!(can_access(Role::OrgAdmin, Surface::Omr));
        assert!(!can_access(Role::OrgAdmin, Surface::Organizations));
        assert!(!can_access(Role::OrgAdmin, Surface::Marketing));
        assert!(!can_access(Role::OrgAdmin, Surface::Coupons));
        assert!(!can_access(Role::OrgAdmin, Surface::FeatureFlags));
    }

    #[test]
    fn test_teacher_gets_course_surfaces_only() {
        assert!(can_access(Role::Teacher, Surface::Quizzes));
        assert!(can_access(Role::Teacher, Surface::LiveSessions));
        assert!(!can_access(Role::Teacher, Surface::Dashboard));
        assert!(!can_access(Role::Teacher, Surface::Users));
        assert!(!can_access(Role::Teacher, Surface::Notifications));
    }

    #[test]
    fn test_students_never_enter() {
        for surface in Surface::all() {
            assert!(!can_access(Role::Student, surface));
        }
        assert_eq!(home_surface(Role::Student), None);
    }

    #[test]
    fn test_home_surfaces() {
        assert_eq!(home_surface(Role::SuperAdmin), Some(Surface::Dashboard));
        assert_eq!(home_surface(Role::OrgAdmin), Some(Surface::Dashboard));
        assert_eq!(home_surface(Role::Teacher), Some(Surface::Courses));
    }
}
