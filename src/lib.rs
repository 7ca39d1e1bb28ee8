#![doc = include_str!("../README.md")]

pub mod config;
pub mod error;
pub mod filter;
pub mod inventory;
pub mod report;
pub mod summary;
pub mod units;

use tracing::info;

/// Fetches the hosts and VMs of `cluster`, applies `filter` to the VMs and
/// summarizes the result.
///
/// # Errors
///
/// Only collector failures are returned, e.g. an unknown or ambiguous cluster
/// name or an unreadable inventory. Empty clusters produce a summary with
/// undefined ratios, not an error.
///
/// # Examples
///
/// ```
/// use vcluster_sizer::{compute_cluster_summary, NameFilter, SnapshotInventory};
///
/// let snapshot = serde_json::from_str(r#"{ "clusters": [ { "name": "lab",
///     "hosts": [ { "name": "esx01", "hardware": { "numCpuCores": 8, "memorySize": 34359738368 } } ],
///     "vms": [ { "name": "vm01", "runtime": { "powerState": "poweredOn" },
///                "config": { "hardware": { "numCPU": 4, "memoryMB": 4096 } } } ] } ] }"#).unwrap();
/// let inventory = SnapshotInventory::new(snapshot);
///
/// let s = compute_cluster_summary(&inventory, "lab", &NameFilter::default()).unwrap();
/// assert_eq!(s.vcpu_to_core_ratio, Some(0.5));
/// assert_eq!(s.host_mem_gb, 32.0);
/// ```
pub fn compute_cluster_summary<C>(
    collector: &C,
    cluster: &str,
    filter: &NameFilter,
) -> Result<ClusterSummary>
where
    C: InventoryCollector + ?Sized,
{
    let hosts = collector.fetch_hosts(cluster)?;
    let vms = filter.apply(collector.fetch_vms(cluster)?);
    info!(
        cluster,
        hosts = hosts.len(),
        vms = vms.len(),
        "summarizing cluster"
    );
    Ok(summarize(cluster, &hosts, &vms))
}


pub use config::Config;
pub use error::{Result, SizerError};
pub use filter::NameFilter;
pub use inventory::{HostRecord, InventoryCollector, SnapshotInventory, VmRecord};
pub use report::{OutputFormat, render};
pub use summary::{ClusterSummary, Distribution, summarize};
