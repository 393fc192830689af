use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
    Cancelled,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 4] = [
        TaskStatus::Pending,
        TaskStatus::InProgress,
        TaskStatus::Completed,
        TaskStatus::Cancelled,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "Pending",
            TaskStatus::InProgress => "In progress",
            TaskStatus::Completed => "Completed",
            TaskStatus::Cancelled => "Cancelled",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskPriority {
    Low,
    Medium,
    High,
}

impl TaskPriority {
    pub const ALL: [TaskPriority; 3] = [TaskPriority::Low, TaskPriority::Medium, TaskPriority::High];

    pub fn label(&self) -> &'static str {
        match self {
            TaskPriority::Low => "Low",
            TaskPriority::Medium => "Medium",
            TaskPriority::High => "High",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub name: String,
    pub description: String,
    /// User/UI-driven only; nothing transitions a task automatically except
    /// the explicit manual-execute action.
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub assignee: String,
    /// Due timestamp as entered on the form; a display label, not a parsed time.
    pub due: String,
    pub pond: String,
}

/// Form input for publishing or editing a task.
#[derive(Debug, Clone)]
pub struct TaskDraft {
    pub name: String,
    pub description: String,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub assignee: String,
    pub due: String,
    pub pond: String,
}

impl Default for TaskDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            status: TaskStatus::Pending,
            priority: TaskPriority::Medium,
            assignee: String::new(),
            due: String::new(),
            pond: String::new(),
        }
    }
}

impl TaskDraft {
    pub fn from_task(task: &Task) -> Self {
        Self {
            name: task.name.clone(),
            description: task.description.clone(),
            status: task.status,
            priority: task.priority,
            assignee: task.assignee.clone(),
            due: task.due.clone(),
            pond: task.pond.clone(),
        }
    }
}

/// Fixed demo backlog shown on first launch.
pub fn seed_tasks() -> Vec<Task> {
    vec![
        Task {
            id: "T-801".into(),
            name: "Water quality sampling".into(),
            description: "Routine water sampling of Pond 4; check ammonia and dissolved oxygen."
                .into(),
            status: TaskStatus::Pending,
            priority: TaskPriority::High,
            assignee: "Chen".into(),
            due: "2024-05-21 10:00".into(),
            pond: "Pond 4".into(),
        },
        Task {
            id: "T-802".into(),
            name: "Feeder maintenance check".into(),
            description: "Inspect feeder drive parts and clear residual feed.".into(),
            status: TaskStatus::InProgress,
            priority: TaskPriority::Medium,
            assignee: "Li".into(),
            due: "2024-05-20 16:30".into(),
            pond: "Pond 1".into(),
        },
        Task {
            id: "T-803".into(),
            name: "Algae removal".into(),
            description: "Clear the chlorella overgrowth along the edge of Pond 2.".into(),
            status: TaskStatus::Completed,
            priority: TaskPriority::Low,
            assignee: "Wang".into(),
            due: "2024-05-19 14:00".into(),
            pond: "Pond 2".into(),
        },
    ]
}
