pub mod device;
pub mod environment;
pub mod filter;
pub mod store;
pub mod task;

pub use device::{Device, DeviceDraft, DeviceKind, DeviceMetadata, DeviceStatus, ExecutionPermission, SignalQuality};
pub use filter::{DeviceFilter, TaskFilter};
pub use store::{DeviceStore, TaskStore};
pub use task::{Task, TaskDraft, TaskPriority, TaskStatus};
