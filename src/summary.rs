//! Cluster-level capacity statistics.
//!
//! [`summarize`] folds the host and VM collections of one cluster into a
//! [`ClusterSummary`]. It is a pure function: no I/O, no failure modes.
//! Values whose denominator would be zero, and statistics over an empty set
//! of powered-on VMs, are `None` rather than infinity or zero.

use crate::inventory::{HostRecord, VmRecord};
use crate::units::{bytes_to_gb, kb_to_gb, mb_to_gb, overcommit_percent, ratio, round2};
use serde::Serialize;
use tracing::debug;

/// Minimum, maximum and average of one resource across powered-on VMs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Distribution {
    pub min: f64,
    pub max: f64,
    pub average: f64,
}

impl Distribution {
    /// Computes the distribution on the native unit, then passes each value
    /// through `convert`. Returns `None` for an empty input.
    fn over<I>(values: I, convert: fn(f64) -> f64) -> Option<Self>
    where
        I: IntoIterator<Item = u64>,
    {
        let mut count = 0u64;
        let mut sum = 0u128;
        let mut min = u64::MAX;
        let mut max = u64::MIN;
        for v in values {
            count += 1;
            sum += u128::from(v);
            min = min.min(v);
            max = max.max(v);
        }
        if count == 0 {
            return None;
        }
        Some(Self {
            min: convert(min as f64),
            max: convert(max as f64),
            average: convert(sum as f64 / count as f64),
        })
    }
}

/// Sum that saturates at `u64::MAX` instead of overflowing.
fn total<I>(values: I) -> u64
where
    I: IntoIterator<Item = u64>,
{
    values.into_iter().fold(0, u64::saturating_add)
}

/// Capacity-planning snapshot of one cluster.
///
/// GB values use binary units (1 GB = 1024 MB) and, like every ratio and
/// percentage, are rounded to two decimals.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterSummary {
    /// Cluster the summary was computed for.
    pub cluster: String,

    // --- Counts ---
    pub total_hosts: usize,
    /// VMs after filtering, regardless of power state.
    pub total_vms: usize,
    pub powered_on_vms: usize,
    /// Powered off or suspended.
    pub inactive_vms: usize,

    // --- Raw sums ---
    pub total_host_cpu_cores: u64,
    pub total_host_memory_bytes: u64,
    pub total_vcpu_all: u64,
    pub total_vmem_all_mb: u64,
    pub total_vcpu_powered_on: u64,
    pub total_vmem_powered_on_mb: u64,
    pub total_vdisk_powered_on_kb: u64,

    // --- Converted units ---
    /// Host memory in GB.
    pub host_mem_gb: f64,
    /// Configured memory of all VMs in GB.
    pub vmem_all_gb: f64,
    /// Configured memory of powered-on VMs in GB.
    pub powered_on_mem_gb: f64,
    /// Disk capacity of powered-on VMs in GB.
    pub vdisk_gb: f64,

    // --- Ratios ---
    /// Formula: `total_vms / total_hosts`
    pub vm_to_host_ratio: Option<f64>,
    /// Formula: `total_vcpu_powered_on / total_host_cpu_cores`
    pub vcpu_to_core_ratio: Option<f64>,
    /// Formula: `(total_vcpu_powered_on - total_host_cpu_cores) / total_host_cpu_cores * 100`
    pub cpu_overcommit_percent: Option<f64>,
    /// Formula: `powered_on_mem_gb / host_mem_gb`
    pub mem_to_host_ratio: Option<f64>,
    /// Formula: `(powered_on_mem_gb - host_mem_gb) / host_mem_gb * 100`
    pub mem_overcommit_percent: Option<f64>,

    // --- Powered-on distributions ---
    /// vCPUs per VM.
    pub vcpu_distribution: Option<Distribution>,
    /// Memory per VM in GB.
    pub vmem_gb_distribution: Option<Distribution>,
    /// Disk per VM in GB.
    pub vdisk_gb_distribution: Option<Distribution>,
}

/// Computes the capacity summary of `cluster` from its hosts and its
/// already-filtered VMs.
///
/// # Examples
///
/// ```
/// use vcluster_sizer::{summarize, HostRecord, VmRecord};
///
/// let hosts = vec![HostRecord::new("esx01", 16, 64 << 30)];
/// let vms = vec![
///     VmRecord::new("web01", true, 4, 8192, 102_400),
///     VmRecord::new("web02", false, 2, 4096, 51_200),
/// ];
///
/// let s = summarize("prod", &hosts, &vms);
/// assert_eq!(s.vcpu_to_core_ratio, Some(0.25));
/// assert_eq!(s.cpu_overcommit_percent, Some(-75.0));
/// assert_eq!(s.vmem_all_gb, 12.0);
/// ```
pub fn summarize(cluster: &str, hosts: &[HostRecord], vms: &[VmRecord]) -> ClusterSummary {
    let total_hosts = hosts.len();
    let total_vms = vms.len();

    let total_host_cpu_cores = total(hosts.iter().map(|h| u64::from(h.cpu_cores)));
    let total_host_memory_bytes = total(hosts.iter().map(|h| h.memory_bytes));
    let total_vcpu_all = total(vms.iter().map(|v| u64::from(v.vcpu_count)));
    let total_vmem_all_mb = total(vms.iter().map(|v| v.vmemory_mb));

    let powered_on: Vec<&VmRecord> = vms.iter().filter(|v| v.powered_on).collect();
    let total_vcpu_powered_on = total(powered_on.iter().map(|v| u64::from(v.vcpu_count)));
    let total_vmem_powered_on_mb = total(powered_on.iter().map(|v| v.vmemory_mb));
    let total_vdisk_powered_on_kb = total(powered_on.iter().map(|v| v.vdisk_kb));

    let host_mem_gb = bytes_to_gb(total_host_memory_bytes);
    let vmem_all_gb = mb_to_gb(total_vmem_all_mb as f64);
    let powered_on_mem_gb = mb_to_gb(total_vmem_powered_on_mb as f64);
    let vdisk_gb = kb_to_gb(total_vdisk_powered_on_kb as f64);

    let summary = ClusterSummary {
        cluster: cluster.to_string(),
        total_hosts,
        total_vms,
        powered_on_vms: powered_on.len(),
        inactive_vms: total_vms - powered_on.len(),
        total_host_cpu_cores,
        total_host_memory_bytes,
        total_vcpu_all,
        total_vmem_all_mb,
        total_vcpu_powered_on,
        total_vmem_powered_on_mb,
        total_vdisk_powered_on_kb,
        host_mem_gb,
        vmem_all_gb,
        powered_on_mem_gb,
        vdisk_gb,
        vm_to_host_ratio: ratio(total_vms as f64, total_hosts as f64),
        vcpu_to_core_ratio: ratio(total_vcpu_powered_on as f64, total_host_cpu_cores as f64),
        cpu_overcommit_percent: overcommit_percent(
            total_vcpu_powered_on as f64,
            total_host_cpu_cores as f64,
        ),
        mem_to_host_ratio: ratio(powered_on_mem_gb, host_mem_gb),
        mem_overcommit_percent: overcommit_percent(powered_on_mem_gb, host_mem_gb),
        vcpu_distribution: Distribution::over(
            powered_on.iter().map(|v| u64::from(v.vcpu_count)),
            round2,
        ),
        vmem_gb_distribution: Distribution::over(powered_on.iter().map(|v| v.vmemory_mb), mb_to_gb),
        vdisk_gb_distribution: Distribution::over(powered_on.iter().map(|v| v.vdisk_kb), kb_to_gb),
    };

    debug!(
        cluster,
        hosts = total_hosts,
        vms = total_vms,
        powered_on = summary.powered_on_vms,
        "computed cluster summary"
    );
    summary
}
