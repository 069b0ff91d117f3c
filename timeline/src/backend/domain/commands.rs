//! Input commands for the schedule store, grouped by entity.

pub mod allocation {
    use chrono::NaiveDate;

    /// Create an allocation starting on the clicked cell
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct CreateAllocationCommand {
        pub team_member_id: String,
        /// Currently selected project; `None` is rejected
        pub project_id: Option<String>,
        pub start_date: NaiveDate,
    }
}

pub mod team_member {
    /// Form input for a new team member. The avatar is derived from the name.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct NewTeamMemberCommand {
        pub name: String,
        pub role: String,
    }
}

pub mod project {
    /// Form input for a new project
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct NewProjectCommand {
        pub name: String,
        /// Falls back to the configured default color when `None`
        pub color: Option<String>,
    }
}
