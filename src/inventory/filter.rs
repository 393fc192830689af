//! Pure filter/search derivation over the entity stores.
//!
//! Predicates are conjunctive across independently selected dimensions and
//! the derived subset preserves the collection's original order. Recomputed
//! on every keystroke; cheap enough that nothing is memoized.

use crate::inventory::device::{Device, DeviceStatus, ExecutionPermission};
use crate::inventory::task::{Task, TaskPriority, TaskStatus};

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeviceFilter {
    /// Case-insensitive substring match on name or id.
    pub query: String,
    pub status: Option<DeviceStatus>,
    pub pond: Option<String>,
    pub permission: Option<ExecutionPermission>,
}

impl DeviceFilter {
    pub fn matches(&self, device: &Device) -> bool {
        let query = self.query.trim();
        if !query.is_empty()
            && !contains_ci(&device.name, query)
            && !contains_ci(&device.id, query)
        {
            return false;
        }
        if let Some(status) = self.status {
            if device.status != status {
                return false;
            }
        }
        if let Some(pond) = &self.pond {
            if &device.pond != pond {
                return false;
            }
        }
        if let Some(permission) = self.permission {
            if device.permission != permission {
                return false;
            }
        }
        true
    }

    pub fn apply<'a>(&self, devices: &'a [Device]) -> Vec<&'a Device> {
        devices.iter().filter(|d| self.matches(d)).collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskFilter {
    /// Case-insensitive substring match on name or id.
    pub query: String,
    /// Case-insensitive substring match on assignee.
    pub assignee: String,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
}

impl TaskFilter {
    pub fn matches(&self, task: &Task) -> bool {
        let query = self.query.trim();
        if !query.is_empty() && !contains_ci(&task.name, query) && !contains_ci(&task.id, query) {
            return false;
        }
        let assignee = self.assignee.trim();
        if !assignee.is_empty() && !contains_ci(&task.assignee, assignee) {
            return false;
        }
        if let Some(status) = self.status {
            if task.status != status {
                return false;
            }
        }
        if let Some(priority) = self.priority {
            if task.priority != priority {
                return false;
            }
        }
        true
    }

    pub fn apply<'a>(&self, tasks: &'a [Task]) -> Vec<&'a Task> {
        tasks.iter().filter(|t| self.matches(t)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::device::seed_devices;
    use crate::inventory::task::seed_tasks;

    #[test]
    fn test_status_filter_preserves_order() {
        // Seed data holds 3 online and 1 offline; trim to 2/2 for the check.
        let mut devices = seed_devices();
        devices[0].status = DeviceStatus::Offline;
        let online: Vec<&str> = devices
            .iter()
            .filter(|d| d.status == DeviceStatus::Online)
            .map(|d| d.id.as_str())
            .collect();
        assert_eq!(online.len(), 2);

        let filter = DeviceFilter {
            status: Some(DeviceStatus::Online),
            ..DeviceFilter::default()
        };
        let visible = filter.apply(&devices);
        let ids: Vec<&str> = visible.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, online);
    }

    #[test]
    fn test_query_matches_name_or_id_case_insensitive() {
        let devices = seed_devices();

        let filter = DeviceFilter {
            query: "aerator".into(),
            ..DeviceFilter::default()
        };
        assert_eq!(filter.apply(&devices).len(), 2);

        let filter = DeviceFilter {
            query: "c-5001".into(),
            ..DeviceFilter::default()
        };
        let visible = filter.apply(&devices);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, "C-5001");
    }

    #[test]
    fn test_predicates_are_conjunctive() {
        let devices = seed_devices();
        let filter = DeviceFilter {
            query: "aerator".into(),
            pond: Some("Pond 2".into()),
            ..DeviceFilter::default()
        };
        let visible = filter.apply(&devices);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, "D-2004");
    }

    #[test]
    fn test_empty_filter_passes_everything() {
        let devices = seed_devices();
        assert_eq!(DeviceFilter::default().apply(&devices).len(), devices.len());
    }

    #[test]
    fn test_task_assignee_substring() {
        let tasks = seed_tasks();
        let filter = TaskFilter {
            assignee: "ch".into(),
            ..TaskFilter::default()
        };
        let visible = filter.apply(&tasks);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].assignee, "Chen");
    }

    #[test]
    fn test_task_status_and_priority() {
        let tasks = seed_tasks();
        let filter = TaskFilter {
            status: Some(TaskStatus::InProgress),
            priority: Some(TaskPriority::Medium),
            ..TaskFilter::default()
        };
        let visible = filter.apply(&tasks);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, "T-802");
    }
}
