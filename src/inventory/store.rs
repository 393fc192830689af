//! In-memory entity stores for the device and task registries.
//!
//! All operations are synchronous and optimistic: there is no external
//! system of record to reconcile against, so the only failure path is
//! required-field validation.

use crate::inventory::device::{
    seed_devices, Device, DeviceDraft, DeviceKind, DeviceMetadata, DeviceStatus, SignalQuality,
};
use crate::inventory::task::{seed_tasks, Task, TaskDraft, TaskStatus};
use crate::{AquadeskError, Result};
use chrono::Utc;
use rand::Rng;
use tracing::debug;

fn require(value: &str, field: &str) -> Result<()> {
    if value.trim().is_empty() {
        Err(AquadeskError::Validation(format!("{field} is required")))
    } else {
        Ok(())
    }
}

pub struct DeviceStore {
    devices: Vec<Device>,
}

impl DeviceStore {
    pub fn new() -> Self {
        Self {
            devices: Vec::new(),
        }
    }

    /// Store pre-populated with the demo inventory.
    pub fn seeded() -> Self {
        Self {
            devices: seed_devices(),
        }
    }

    pub fn all(&self) -> &[Device] {
        &self.devices
    }

    pub fn get(&self, id: &str) -> Option<&Device> {
        self.devices.iter().find(|d| d.id == id)
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    /// Distinct pond labels in first-seen order, for filter dropdowns.
    pub fn ponds(&self) -> Vec<String> {
        let mut ponds: Vec<String> = Vec::new();
        for device in &self.devices {
            if !ponds.iter().any(|p| p == &device.pond) {
                ponds.push(device.pond.clone());
            }
        }
        ponds
    }

    /// Register a new device at the front of the collection.
    ///
    /// New devices come up online with a fresh check-in timestamp and
    /// factory metadata.
    pub fn create(&mut self, draft: &DeviceDraft) -> Result<Device> {
        require(&draft.name, "Device name")?;
        require(&draft.pond, "Pond")?;

        let device = Device {
            id: self.next_id(draft.kind),
            name: draft.name.trim().to_string(),
            kind: draft.kind,
            status: DeviceStatus::Online,
            pond: draft.pond.trim().to_string(),
            permission: draft.permission,
            last_active: Utc::now(),
            metadata: DeviceMetadata {
                battery: None,
                signal: Some(SignalQuality::Strong),
                firmware: "v1.0.0".into(),
            },
        };
        debug!("Registered device {} ({})", device.id, device.name);
        self.devices.insert(0, device.clone());
        Ok(device)
    }

    /// Replace the editable fields of the matching record in place.
    /// Returns false when no record has the given id.
    pub fn update(&mut self, id: &str, draft: &DeviceDraft) -> Result<bool> {
        require(&draft.name, "Device name")?;
        require(&draft.pond, "Pond")?;

        match self.devices.iter_mut().find(|d| d.id == id) {
            Some(device) => {
                device.name = draft.name.trim().to_string();
                device.kind = draft.kind;
                device.pond = draft.pond.trim().to_string();
                device.permission = draft.permission;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.devices.len();
        self.devices.retain(|d| d.id != id);
        self.devices.len() != before
    }

    fn next_id(&self, kind: DeviceKind) -> String {
        let mut rng = rand::thread_rng();
        loop {
            let candidate = format!("{}-{}", kind.id_prefix(), rng.gen_range(1000..10000));
            if self.get(&candidate).is_none() {
                return candidate;
            }
        }
    }
}

impl Default for DeviceStore {
    fn default() -> Self {
        Self::new()
    }
}

pub struct TaskStore {
    tasks: Vec<Task>,
}

impl TaskStore {
    pub fn new() -> Self {
        Self { tasks: Vec::new() }
    }

    /// Store pre-populated with the demo backlog.
    pub fn seeded() -> Self {
        Self {
            tasks: seed_tasks(),
        }
    }

    pub fn all(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Publish a new task at the front of the collection.
    pub fn create(&mut self, draft: &TaskDraft) -> Result<Task> {
        require(&draft.name, "Task name")?;
        require(&draft.assignee, "Assignee")?;

        let task = Task {
            id: self.next_id(),
            name: draft.name.trim().to_string(),
            description: draft.description.clone(),
            status: draft.status,
            priority: draft.priority,
            assignee: draft.assignee.trim().to_string(),
            due: draft.due.clone(),
            pond: draft.pond.clone(),
        };
        debug!("Published task {} ({})", task.id, task.name);
        self.tasks.insert(0, task.clone());
        Ok(task)
    }

    pub fn update(&mut self, id: &str, draft: &TaskDraft) -> Result<bool> {
        require(&draft.name, "Task name")?;
        require(&draft.assignee, "Assignee")?;

        match self.tasks.iter_mut().find(|t| t.id == id) {
            Some(task) => {
                task.name = draft.name.trim().to_string();
                task.description = draft.description.clone();
                task.status = draft.status;
                task.priority = draft.priority;
                task.assignee = draft.assignee.trim().to_string();
                task.due = draft.due.clone();
                task.pond = draft.pond.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        self.tasks.len() != before
    }

    /// Force a status transition. Returns false when no record matches.
    pub fn set_status(&mut self, id: &str, status: TaskStatus) -> bool {
        match self.tasks.iter_mut().find(|t| t.id == id) {
            Some(task) => {
                task.status = status;
                true
            }
            None => false,
        }
    }

    fn next_id(&self) -> String {
        let mut rng = rand::thread_rng();
        loop {
            let candidate = format!("T-{}", rng.gen_range(800..1000));
            if self.get(&candidate).is_none() {
                return candidate;
            }
        }
    }
}

impl Default for TaskStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::device::ExecutionPermission;
    use crate::inventory::task::TaskPriority;

    fn device_draft(name: &str, pond: &str) -> DeviceDraft {
        DeviceDraft {
            name: name.into(),
            kind: DeviceKind::Feeder,
            pond: pond.into(),
            permission: ExecutionPermission::ManualOrAi,
            description: String::new(),
        }
    }

    #[test]
    fn test_create_rejects_missing_required_fields() {
        let mut store = DeviceStore::seeded();
        let before = store.len();

        assert!(store.create(&device_draft("", "Pond 1")).is_err());
        assert!(store.create(&device_draft("  ", "Pond 1")).is_err());
        assert!(store.create(&device_draft("Feeder B", "")).is_err());
        assert_eq!(store.len(), before);
    }

    #[test]
    fn test_create_prepends_with_unique_id() {
        let mut store = DeviceStore::seeded();
        let before = store.len();

        let created = store.create(&device_draft("Feeder B", "Pond 5")).unwrap();
        assert_eq!(store.len(), before + 1);
        assert_eq!(store.all()[0].id, created.id);
        assert_eq!(
            store.all().iter().filter(|d| d.id == created.id).count(),
            1
        );
        assert!(created.id.starts_with("D-"));
    }

    #[test]
    fn test_camera_ids_use_camera_prefix() {
        let mut store = DeviceStore::new();
        let mut draft = device_draft("Cam", "Pond 1");
        draft.kind = DeviceKind::Camera;
        let created = store.create(&draft).unwrap();
        assert!(created.id.starts_with("C-"));
    }

    #[test]
    fn test_update_edits_in_place() {
        let mut store = DeviceStore::seeded();
        let id = store.all()[1].id.clone();
        let position = 1;

        let mut draft = device_draft("Renamed Aerator", "Pond 9");
        draft.kind = DeviceKind::Aerator;
        assert!(store.update(&id, &draft).unwrap());

        let device = &store.all()[position];
        assert_eq!(device.id, id);
        assert_eq!(device.name, "Renamed Aerator");
        assert_eq!(device.pond, "Pond 9");

        assert!(!store.update("D-0000", &draft).unwrap());
    }

    #[test]
    fn test_remove_deletes_exactly_one() {
        let mut store = DeviceStore::seeded();
        let ids: Vec<String> = store.all().iter().map(|d| d.id.clone()).collect();

        assert!(store.remove(&ids[1]));
        let remaining: Vec<String> = store.all().iter().map(|d| d.id.clone()).collect();
        assert_eq!(remaining, vec![ids[0].clone(), ids[2].clone(), ids[3].clone()]);

        assert!(!store.remove("D-0000"));
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_ponds_unique_first_seen() {
        let mut store = DeviceStore::seeded();
        store.create(&device_draft("Feeder B", "Pond 4")).unwrap();
        let ponds = store.ponds();
        assert_eq!(ponds.iter().filter(|p| p.as_str() == "Pond 4").count(), 1);
    }

    #[test]
    fn test_task_create_and_execute_transition() {
        let mut store = TaskStore::seeded();
        let draft = TaskDraft {
            name: "Net inspection".into(),
            assignee: "Chen".into(),
            priority: TaskPriority::High,
            ..TaskDraft::default()
        };
        let task = store.create(&draft).unwrap();
        assert_eq!(store.all()[0].id, task.id);
        assert_eq!(task.status, TaskStatus::Pending);

        assert!(store.set_status(&task.id, TaskStatus::Completed));
        assert_eq!(store.get(&task.id).unwrap().status, TaskStatus::Completed);
        assert!(!store.set_status("T-000", TaskStatus::Completed));
    }

    #[test]
    fn test_task_create_requires_name_and_assignee() {
        let mut store = TaskStore::new();
        let draft = TaskDraft {
            name: String::new(),
            assignee: "Chen".into(),
            ..TaskDraft::default()
        };
        assert!(store.create(&draft).is_err());

        let draft = TaskDraft {
            name: "Net inspection".into(),
            assignee: " ".into(),
            ..TaskDraft::default()
        };
        assert!(store.create(&draft).is_err());
        assert!(store.is_empty());
    }
}
