//! Role-based permissions with a static per-role table.

use serde::{Deserialize, Serialize};
use crate::error::ValidationError;

/// A capability a role may hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    /// Create, edit and remove users
    ManageUsers,
    /// Create, edit and remove any project
    ManageProjects,
    /// Create, edit and remove any task
    ManageTasks,
    /// Edit tasks assigned to oneself
    ManageOwnTasks,
    /// See projects
    ViewProjects,
    /// See all reports
    ViewReports,
    /// Export data
    ExportData,
    /// Change application settings
    ManageSettings,
    /// Configure third-party integrations
    ManageIntegrations,
    /// Edit role permissions
    ManageRoles,
    /// Log time entries
    TrackTime,
    /// Manage team membership
    ManageTeam,
    /// Assign tasks to others
    AssignTasks,
    /// Comment on tasks
    CommentTasks,
    /// Upload files
    UploadFiles,
    /// See one's own reports
    ViewOwnReports,
    /// See time tracking data
    ViewTimeTracking,
}

impl Permission {
    /// Every permission.
    pub const ALL: [Permission; 17] = [
        Self::ManageUsers,
        Self::ManageProjects,
        Self::ManageTasks,
        Self::ManageOwnTasks,
        Self::ViewProjects,
        Self::ViewReports,
        Self::ExportData,
        Self::ManageSettings,
        Self::ManageIntegrations,
        Self::ManageRoles,
        Self::TrackTime,
        Self::ManageTeam,
        Self::AssignTasks,
        Self::CommentTasks,
        Self::UploadFiles,
        Self::ViewOwnReports,
        Self::ViewTimeTracking,
    ];

    /// Get string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ManageUsers => "manage_users",
            Self::ManageProjects => "manage_projects",
            Self::ManageTasks => "manage_tasks",
            Self::ManageOwnTasks => "manage_own_tasks",
            Self::ViewProjects => "view_projects",
            Self::ViewReports => "view_reports",
            Self::ExportData => "export_data",
            Self::ManageSettings => "manage_settings",
            Self::ManageIntegrations => "manage_integrations",
            Self::ManageRoles => "manage_roles",
            Self::TrackTime => "track_time",
            Self::ManageTeam => "manage_team",
            Self::AssignTasks => "assign_tasks",
            Self::CommentTasks => "comment_tasks",
            Self::UploadFiles => "upload_files",
            Self::ViewOwnReports => "view_own_reports",
            Self::ViewTimeTracking => "view_time_tracking",
        }
    }

    /// Human-readable description.
    pub fn description(&self) -> &'static str {
        match self {
            Self::ManageUsers => "Manage all users",
            Self::ManageProjects => "Create, edit, delete projects",
            Self::ManageTasks => "Create, edit, delete tasks",
            Self::ManageOwnTasks => "Manage own assigned tasks",
            Self::ViewProjects => "View project details",
            Self::ViewReports => "View reports and analytics",
            Self::ExportData => "Export project or report data",
            Self::ManageSettings => "Change system settings",
            Self::ManageIntegrations => "Manage third-party integrations",
            Self::ManageRoles => "Manage user roles and permissions",
            Self::TrackTime => "Track and log time entries",
            Self::ManageTeam => "Manage team members",
            Self::AssignTasks => "Assign tasks to team members",
            Self::CommentTasks => "Add comments to tasks",
            Self::UploadFiles => "Upload files to projects",
            Self::ViewOwnReports => "View own task reports",
            Self::ViewTimeTracking => "View time tracking data",
        }
    }
}

impl std::fmt::Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Permission {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| ValidationError::unknown("permission", s))
    }
}

use Permission::*;

const ADMIN: &[Permission] = &[
    ManageUsers,
    ManageProjects,
    ManageTasks,
    ViewProjects,
    ViewReports,
    ExportData,
    ManageSettings,
    ManageIntegrations,
    ManageRoles,
    TrackTime,
    ManageTeam,
    AssignTasks,
    CommentTasks,
    UploadFiles,
    ViewOwnReports,
    ViewTimeTracking,
];

const PROJECT_MANAGER: &[Permission] = &[
    ManageProjects,
    ManageTasks,
    ViewProjects,
    ViewReports,
    ExportData,
    ManageTeam,
    TrackTime,
    AssignTasks,
    CommentTasks,
    UploadFiles,
    ViewOwnReports,
    ViewTimeTracking,
];

const MEMBER: &[Permission] = &[
    ViewProjects,
    ManageOwnTasks,
    CommentTasks,
    UploadFiles,
    TrackTime,
    ViewOwnReports,
];

/// A user role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Full access
    Admin,
    /// Runs projects and teams
    ProjectManager,
    /// Works on assigned tasks
    Member,
}

impl Role {
    /// Every role.
    pub const ALL: [Role; 3] = [Self::Admin, Self::ProjectManager, Self::Member];

    /// Permissions granted to this role.
    pub fn permissions(&self) -> &'static [Permission] {
        match self {
            Self::Admin => ADMIN,
            Self::ProjectManager => PROJECT_MANAGER,
            Self::Member => MEMBER,
        }
    }

    /// Whether this role holds `permission`.
    pub fn allows(&self, permission: Permission) -> bool {
        self.permissions().contains(&permission)
    }

    /// Get string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::ProjectManager => "project_manager",
            Self::Member => "member",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace([' ', '-'], "_").as_str() {
            "admin" => Ok(Self::Admin),
            "project_manager" => Ok(Self::ProjectManager),
            "member" => Ok(Self::Member),
            _ => Err(ValidationError::unknown("role", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_sizes() {
        assert_eq!(Role::Admin.permissions().len(), 16);
        assert_eq!(Role::ProjectManager.permissions().len(), 12);
        assert_eq!(Role::Member.permissions().len(), 6);
    }

    #[test]
    fn test_admin_lacks_only_own_tasks() {
        let missing: Vec<_> = Permission::ALL
            .iter()
            .filter(|p| !Role::Admin.allows(**p))
            .collect();
        assert_eq!(missing, vec![&Permission::ManageOwnTasks]);
    }

    #[test]
    fn test_member_cannot_manage_projects() {
        assert!(!Role::Member.allows(Permission::ManageProjects));
        assert!(Role::Member.allows(Permission::ManageOwnTasks));
        assert!(Role::ProjectManager.allows(Permission::AssignTasks));
        assert!(!Role::ProjectManager.allows(Permission::ManageSettings));
    }

    #[test]
    fn test_permission_names_roundtrip() {
        for p in Permission::ALL {
            assert_eq!(p.as_str().parse::<Permission>().unwrap(), p);
        }
        assert!("delete_everything".parse::<Permission>().is_err());
    }

    #[test]
    fn test_role_parse() {
        assert_eq!("Project Manager".parse::<Role>().unwrap(), Role::ProjectManager);
        assert!("guest".parse::<Role>().is_err());
    }
}
