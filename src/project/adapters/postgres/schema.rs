//! Diesel schema for project/task persistence.

diesel::table! {
    /// Project rows.
    projects (id) {
        /// Project identifier.
        id -> Uuid,
        /// Owning tenant.
        tenant_id -> Uuid,
        /// Project name.
        #[max_length = 255]
        name -> Varchar,
        /// Project description.
        description -> Text,
        /// Lifecycle status.
        #[max_length = 50]
        status -> Varchar,
        /// Creating user.
        created_by -> Uuid,
        /// Optional client association.
        client_id -> Nullable<Uuid>,
        /// Creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Participant rows; unique per (project, employee).
    project_participants (project_id, employee_id) {
        /// Owning project.
        project_id -> Uuid,
        /// Member employee.
        employee_id -> Uuid,
        /// Free-form role label.
        #[max_length = 100]
        role -> Varchar,
    }
}

diesel::table! {
    /// Leader rows; every leader is also a participant.
    project_leaders (project_id, employee_id) {
        /// Owning project.
        project_id -> Uuid,
        /// Leader employee.
        employee_id -> Uuid,
    }
}

diesel::table! {
    /// Task rows.
    tasks (id) {
        /// Task identifier.
        id -> Uuid,
        /// Owning project.
        project_id -> Uuid,
        /// Owning tenant; always the owning project's tenant.
        tenant_id -> Uuid,
        /// Task name.
        #[max_length = 255]
        name -> Varchar,
        /// Task description.
        description -> Text,
        /// Lifecycle status.
        #[max_length = 50]
        status -> Varchar,
        /// Optional free-form priority label.
        #[max_length = 50]
        priority -> Nullable<Varchar>,
        /// Deadline timestamp.
        deadline -> Timestamptz,
        /// Assignment timestamp.
        assigned_at -> Timestamptz,
        /// Completion timestamp; set iff the status is closed.
        completed_at -> Nullable<Timestamptz>,
        /// Assigning user.
        assigned_by -> Uuid,
    }
}

diesel::table! {
    /// Task assignee rows.
    task_assignees (task_id, employee_id) {
        /// Owning task.
        task_id -> Uuid,
        /// Assigned employee.
        employee_id -> Uuid,
    }
}
