//! Request contracts by entity.

pub mod project;
pub mod session;
pub mod task;
pub mod workspace;

pub use project::{CreateProjectRequest, UpdateProjectRequest};
pub use session::{IssueSessionRequest, LogoutRequest};
pub use task::{AssignTaskRequest, CreateTaskRequest, TaskFilters, UpdateTaskRequest};
pub use workspace::{CreateWorkspaceRequest, InviteMemberRequest, UpdateWorkspaceRequest};
