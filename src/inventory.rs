//! Inventory records and the collector seam.
//!
//! The sizer never talks to a hypervisor manager directly. Whatever produces
//! inventory implements [`InventoryCollector`]; [`SnapshotInventory`] is the
//! bundled implementation that reads a point-in-time JSON export.

use crate::error::{Result, SizerError};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Power state string that marks a VM as running. Anything else is not powered on.
pub const POWERED_ON: &str = "poweredOn";

/// Device kind counted towards a VM's disk capacity.
pub const VIRTUAL_DISK: &str = "VirtualDisk";

/// One physical host of the cluster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostRecord {
    pub name: String,
    /// Total physical CPU cores.
    pub cpu_cores: u32,
    /// Total physical memory in bytes.
    pub memory_bytes: u64,
}

impl HostRecord {
    pub fn new(name: impl Into<String>, cpu_cores: u32, memory_bytes: u64) -> Self {
        Self {
            name: name.into(),
            cpu_cores,
            memory_bytes,
        }
    }
}

/// One virtual machine of the cluster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VmRecord {
    pub name: String,
    pub powered_on: bool,
    /// Configured virtual CPUs.
    pub vcpu_count: u32,
    /// Configured memory in MB.
    pub vmemory_mb: u64,
    /// Sum of virtual disk capacities in KB.
    pub vdisk_kb: u64,
}

impl VmRecord {
    pub fn new(
        name: impl Into<String>,
        powered_on: bool,
        vcpu_count: u32,
        vmemory_mb: u64,
        vdisk_kb: u64,
    ) -> Self {
        Self {
            name: name.into(),
            powered_on,
            vcpu_count,
            vmemory_mb,
            vdisk_kb,
        }
    }
}

/// Source of host and VM records for a named cluster.
///
/// Implementations resolve `cluster` to exactly one cluster and fail with
/// [`SizerError::ClusterNotFound`] or [`SizerError::AmbiguousCluster`] otherwise.
pub trait InventoryCollector {
    fn fetch_hosts(&self, cluster: &str) -> Result<Vec<HostRecord>>;
    fn fetch_vms(&self, cluster: &str) -> Result<Vec<VmRecord>>;
}

// --- Raw inventory documents, shaped like the manager's host/VM views ---
//
// Hardware blocks keep the manager's property names and require their
// resource fields, so a renamed or misspelled key fails the load instead of
// reading as zero.

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct InventorySnapshot {
    pub clusters: Vec<RawCluster>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawCluster {
    pub name: String,
    pub hosts: Vec<RawHost>,
    pub vms: Vec<RawVm>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawHost {
    #[serde(default)]
    pub name: String,
    pub hardware: RawHostHardware,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawHostHardware {
    pub num_cpu_cores: u32,
    /// Bytes.
    pub memory_size: u64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawVm {
    pub name: String,
    pub runtime: RawVmRuntime,
    /// Absent for VMs whose configuration is inaccessible.
    pub config: Option<RawVmConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawVmRuntime {
    pub power_state: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawVmConfig {
    pub hardware: RawVmHardware,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawVmHardware {
    #[serde(rename = "numCPU")]
    pub num_cpu: u32,
    #[serde(rename = "memoryMB")]
    pub memory_mb: u64,
    #[serde(default)]
    pub devices: Vec<RawDevice>,
}

/// A VM device. Virtual disks must carry `capacityInKB`.
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "RawDeviceDoc")]
pub struct RawDevice {
    pub kind: String,
    pub capacity_in_kb: Option<u64>,
}

#[derive(Deserialize)]
struct RawDeviceDoc {
    kind: String,
    #[serde(rename = "capacityInKB")]
    capacity_in_kb: Option<u64>,
}

impl TryFrom<RawDeviceDoc> for RawDevice {
    type Error = String;

    fn try_from(doc: RawDeviceDoc) -> std::result::Result<Self, Self::Error> {
        if doc.kind == VIRTUAL_DISK && doc.capacity_in_kb.is_none() {
            return Err(format!("{VIRTUAL_DISK} device without capacityInKB"));
        }
        Ok(Self {
            kind: doc.kind,
            capacity_in_kb: doc.capacity_in_kb,
        })
    }
}

impl RawDevice {
    fn is_virtual_disk(&self) -> bool {
        self.kind == VIRTUAL_DISK
    }
}

impl From<&RawHost> for HostRecord {
    fn from(raw: &RawHost) -> Self {
        HostRecord::new(
            raw.name.clone(),
            raw.hardware.num_cpu_cores,
            raw.hardware.memory_size,
        )
    }
}

impl From<&RawVm> for VmRecord {
    fn from(raw: &RawVm) -> Self {
        let hardware = raw.config.as_ref().map(|c| &c.hardware);
        let vdisk_kb = hardware
            .map(|hw| {
                hw.devices
                    .iter()
                    .filter(|d| d.is_virtual_disk())
                    .filter_map(|d| d.capacity_in_kb)
                    .fold(0u64, u64::saturating_add)
            })
            .unwrap_or(0);

        VmRecord {
            name: raw.name.clone(),
            powered_on: raw.runtime.power_state == POWERED_ON,
            vcpu_count: hardware.map_or(0, |hw| hw.num_cpu),
            vmemory_mb: hardware.map_or(0, |hw| hw.memory_mb),
            vdisk_kb,
        }
    }
}

/// Collector backed by an exported inventory snapshot.
#[derive(Debug, Clone)]
pub struct SnapshotInventory {
    snapshot: InventorySnapshot,
}

impl SnapshotInventory {
    pub fn new(snapshot: InventorySnapshot) -> Self {
        Self { snapshot }
    }

    /// Loads a snapshot from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| SizerError::InventoryRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let snapshot: InventorySnapshot =
            serde_json::from_str(&content).map_err(|e| SizerError::InventoryParse {
                path: path.to_path_buf(),
                source: e,
            })?;
        debug!(
            path = %path.display(),
            clusters = snapshot.clusters.len(),
            "loaded inventory snapshot"
        );
        Ok(Self::new(snapshot))
    }

    fn cluster(&self, name: &str) -> Result<&RawCluster> {
        let mut matches = self.snapshot.clusters.iter().filter(|c| c.name == name);
        let found = matches.next().ok_or_else(|| SizerError::ClusterNotFound {
            cluster: name.to_string(),
        })?;
        let extra = matches.count();
        if extra > 0 {
            return Err(SizerError::AmbiguousCluster {
                cluster: name.to_string(),
                matches: extra + 1,
            });
        }
        Ok(found)
    }
}

impl InventoryCollector for SnapshotInventory {
    fn fetch_hosts(&self, cluster: &str) -> Result<Vec<HostRecord>> {
        let hosts: Vec<HostRecord> = self
            .cluster(cluster)?
            .hosts
            .iter()
            .map(HostRecord::from)
            .collect();
        debug!(cluster, count = hosts.len(), "fetched hosts");
        Ok(hosts)
    }

    fn fetch_vms(&self, cluster: &str) -> Result<Vec<VmRecord>> {
        let vms: Vec<VmRecord> = self
            .cluster(cluster)?
            .vms
            .iter()
            .map(VmRecord::from)
            .collect();
        debug!(cluster, count = vms.len(), "fetched vms");
        Ok(vms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn snapshot(value: serde_json::Value) -> SnapshotInventory {
        SnapshotInventory::new(serde_json::from_value(value).unwrap())
    }

    fn vm_with_devices(devices: serde_json::Value) -> RawVm {
        serde_json::from_value(json!({
            "name": "db01",
            "runtime": { "powerState": "poweredOn" },
            "config": { "hardware": { "numCPU": 4, "memoryMB": 8192, "devices": devices } }
        }))
        .unwrap()
    }

    #[test]
    fn disk_sum_counts_only_virtual_disks() {
        let raw = vm_with_devices(json!([
            { "kind": "VirtualDisk", "capacityInKB": 10240 },
            { "kind": "VirtualDisk", "capacityInKB": 20480 },
            { "kind": "VirtualVmxnet3" }
        ]));
        assert_eq!(VmRecord::from(&raw).vdisk_kb, 30720);
    }

    #[test]
    fn vm_without_disks_has_zero_capacity() {
        let raw = vm_with_devices(json!([
            { "kind": "VirtualCdrom" },
            { "kind": "ParaVirtualSCSIController" }
        ]));
        assert_eq!(VmRecord::from(&raw).vdisk_kb, 0);
    }

    #[test]
    fn reads_manager_property_names() {
        let raw = vm_with_devices(json!([{ "kind": "VirtualDisk", "capacityInKB": 2048 }]));
        assert_eq!(
            VmRecord::from(&raw),
            VmRecord::new("db01", true, 4, 8192, 2048)
        );
    }

    #[test]
    fn misspelled_hardware_key_is_rejected() {
        let parsed = serde_json::from_value::<RawVm>(json!({
            "name": "web01",
            "runtime": { "powerState": "poweredOn" },
            "config": { "hardware": { "numCpu": 4, "memoryMB": 8192 } }
        }));
        assert!(parsed.unwrap_err().to_string().contains("numCPU"));

        let parsed = serde_json::from_value::<RawHost>(json!({
            "name": "esx01", "hardware": { "cpuCores": 16, "memorySize": 1024 }
        }));
        assert!(parsed.is_err());
    }

    #[test]
    fn virtual_disk_without_capacity_is_rejected() {
        let parsed = serde_json::from_value::<RawVm>(json!({
            "name": "db01",
            "config": { "hardware": { "numCPU": 2, "memoryMB": 2048,
                "devices": [ { "kind": "VirtualDisk", "capacityInKb": 10240 } ] } }
        }));
        assert!(parsed.unwrap_err().to_string().contains("capacityInKB"));
    }

    #[test]
    fn disk_sum_saturates_instead_of_overflowing() {
        let raw = vm_with_devices(json!([
            { "kind": "VirtualDisk", "capacityInKB": u64::MAX },
            { "kind": "VirtualDisk", "capacityInKB": 1 }
        ]));
        assert_eq!(VmRecord::from(&raw).vdisk_kb, u64::MAX);
    }

    #[test]
    fn only_powered_on_state_counts_as_running() {
        for (state, expected) in [
            ("poweredOn", true),
            ("poweredOff", false),
            ("suspended", false),
            ("PoweredOn", false),
            ("", false),
        ] {
            let raw: RawVm = serde_json::from_value(json!({
                "name": "vm", "runtime": { "powerState": state }
            }))
            .unwrap();
            assert_eq!(VmRecord::from(&raw).powered_on, expected, "state {state:?}");
        }
    }

    #[test]
    fn missing_config_defaults_to_zero() {
        let raw: RawVm = serde_json::from_value(json!({ "name": "orphan" })).unwrap();
        assert_eq!(VmRecord::from(&raw), VmRecord::new("orphan", false, 0, 0, 0));
    }

    #[test]
    fn fetches_records_for_named_cluster() {
        let inv = snapshot(json!({ "clusters": [
            { "name": "prod",
              "hosts": [ { "name": "esx01", "hardware": { "numCpuCores": 16, "memorySize": 1024 } } ],
              "vms": [ { "name": "web01", "runtime": { "powerState": "poweredOn" } } ] },
            { "name": "lab", "hosts": [], "vms": [] }
        ]}));

        let hosts = inv.fetch_hosts("prod").unwrap();
        assert_eq!(hosts, vec![HostRecord::new("esx01", 16, 1024)]);
        assert_eq!(inv.fetch_vms("prod").unwrap().len(), 1);
        assert!(inv.fetch_vms("lab").unwrap().is_empty());
    }

    #[test]
    fn unknown_cluster_is_an_error() {
        let inv = snapshot(json!({ "clusters": [ { "name": "prod" } ] }));
        assert!(matches!(
            inv.fetch_hosts("staging"),
            Err(SizerError::ClusterNotFound { .. })
        ));
    }

    #[test]
    fn duplicate_cluster_names_are_ambiguous() {
        let inv = snapshot(json!({ "clusters": [ { "name": "prod" }, { "name": "prod" } ] }));
        assert!(matches!(
            inv.fetch_vms("prod"),
            Err(SizerError::AmbiguousCluster { matches: 2, .. })
        ));
    }
}
