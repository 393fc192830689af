use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeviceKind {
    Feeder,
    Aerator,
    Camera,
}

impl DeviceKind {
    pub const ALL: [DeviceKind; 3] = [DeviceKind::Feeder, DeviceKind::Aerator, DeviceKind::Camera];

    pub fn label(&self) -> &'static str {
        match self {
            DeviceKind::Feeder => "Feeder",
            DeviceKind::Aerator => "Aerator",
            DeviceKind::Camera => "Camera",
        }
    }

    /// Id prefix used when registering a new device of this kind.
    pub fn id_prefix(&self) -> &'static str {
        match self {
            DeviceKind::Camera => "C",
            _ => "D",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeviceStatus {
    Online,
    Offline,
}

impl DeviceStatus {
    pub fn label(&self) -> &'static str {
        match self {
            DeviceStatus::Online => "Online",
            DeviceStatus::Offline => "Offline",
        }
    }
}

/// Which control sources may operate a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExecutionPermission {
    ManualOnly,
    ManualOrAi,
    AiOnly,
}

impl ExecutionPermission {
    pub const ALL: [ExecutionPermission; 3] = [
        ExecutionPermission::ManualOnly,
        ExecutionPermission::ManualOrAi,
        ExecutionPermission::AiOnly,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ExecutionPermission::ManualOnly => "Manual only",
            ExecutionPermission::ManualOrAi => "Manual / AI",
            ExecutionPermission::AiOnly => "AI only",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignalQuality {
    Strong,
    Medium,
    Weak,
}

impl SignalQuality {
    pub fn label(&self) -> &'static str {
        match self {
            SignalQuality::Strong => "Strong",
            SignalQuality::Medium => "Medium",
            SignalQuality::Weak => "Weak",
        }
    }
}

/// Opaque per-device readings reported on the last check-in.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeviceMetadata {
    pub battery: Option<u8>,
    pub signal: Option<SignalQuality>,
    pub firmware: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Device {
    pub id: String,
    pub name: String,
    pub kind: DeviceKind,
    pub status: DeviceStatus,
    /// Free-text pond label; no referential integrity is enforced.
    pub pond: String,
    pub permission: ExecutionPermission,
    pub last_active: DateTime<Utc>,
    pub metadata: DeviceMetadata,
}

/// Form input for registering or editing a device.
#[derive(Debug, Clone)]
pub struct DeviceDraft {
    pub name: String,
    pub kind: DeviceKind,
    pub pond: String,
    pub permission: ExecutionPermission,
    pub description: String,
}

impl Default for DeviceDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            kind: DeviceKind::Feeder,
            pond: String::new(),
            permission: ExecutionPermission::ManualOrAi,
            description: String::new(),
        }
    }
}

impl DeviceDraft {
    pub fn from_device(device: &Device) -> Self {
        Self {
            name: device.name.clone(),
            kind: device.kind,
            pond: device.pond.clone(),
            permission: device.permission,
            description: String::new(),
        }
    }
}

fn seed_time(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|t| t.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

/// Fixed demo inventory shown on first launch.
pub fn seed_devices() -> Vec<Device> {
    vec![
        Device {
            id: "D-1001".into(),
            name: "Smart Feeder A".into(),
            kind: DeviceKind::Feeder,
            status: DeviceStatus::Online,
            pond: "Pond 4".into(),
            permission: ExecutionPermission::ManualOrAi,
            last_active: seed_time("2024-05-20T14:30:00Z"),
            metadata: DeviceMetadata {
                battery: Some(85),
                signal: Some(SignalQuality::Strong),
                firmware: "v2.1.0".into(),
            },
        },
        Device {
            id: "D-2003".into(),
            name: "Main Pond Aerator".into(),
            kind: DeviceKind::Aerator,
            status: DeviceStatus::Online,
            pond: "Pond 1".into(),
            permission: ExecutionPermission::AiOnly,
            last_active: seed_time("2024-05-20T15:10:00Z"),
            metadata: DeviceMetadata {
                battery: None,
                signal: Some(SignalQuality::Medium),
                firmware: "v1.4.5".into(),
            },
        },
        Device {
            id: "C-5001".into(),
            name: "Panorama Camera North".into(),
            kind: DeviceKind::Camera,
            status: DeviceStatus::Offline,
            pond: "Pond 3".into(),
            permission: ExecutionPermission::ManualOnly,
            last_active: seed_time("2024-05-19T09:22:00Z"),
            metadata: DeviceMetadata {
                battery: None,
                signal: Some(SignalQuality::Weak),
                firmware: "v3.0.2".into(),
            },
        },
        Device {
            id: "D-2004".into(),
            name: "Pond 2 Aerator".into(),
            kind: DeviceKind::Aerator,
            status: DeviceStatus::Online,
            pond: "Pond 2".into(),
            permission: ExecutionPermission::ManualOrAi,
            last_active: seed_time("2024-05-20T15:45:00Z"),
            metadata: DeviceMetadata {
                battery: None,
                signal: Some(SignalQuality::Strong),
                firmware: "v1.4.5".into(),
            },
        },
    ]
}
