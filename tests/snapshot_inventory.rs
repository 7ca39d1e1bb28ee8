use std::io::Write;
use vcluster_sizer::{
    NameFilter, OutputFormat, SizerError, SnapshotInventory, compute_cluster_summary, render,
};

const INVENTORY: &str = include_str!("../demos/inventory.json");

fn inventory_file(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn sizes_cluster_from_snapshot_file() {
    let file = inventory_file(INVENTORY);
    let inventory = SnapshotInventory::load(file.path()).unwrap();

    let s = compute_cluster_summary(&inventory, "prod", &NameFilter::default()).unwrap();
    assert_eq!(s.total_hosts, 2);
    assert_eq!(s.total_vms, 4);
    assert_eq!(s.powered_on_vms, 3);
    assert_eq!(s.total_host_cpu_cores, 32);
    assert_eq!(s.total_vcpu_all, 16);
    assert_eq!(s.total_vcpu_powered_on, 14);
    assert_eq!(s.total_vdisk_powered_on_kb, 358_400);
    assert_eq!(s.vcpu_to_core_ratio, Some(0.44));
    assert_eq!(s.cpu_overcommit_percent, Some(-56.25));
    assert_eq!(s.vm_to_host_ratio, Some(2.0));
}

#[test]
fn excluding_template_and_largest_vm() {
    let inventory = SnapshotInventory::load(inventory_file(INVENTORY).path()).unwrap();
    let filter = NameFilter::new(Vec::<String>::new(), ["template-linux", "app02"]);

    let s = compute_cluster_summary(&inventory, "prod", &filter).unwrap();
    assert_eq!(s.total_vms, 2);
    assert_eq!(s.total_vcpu_powered_on, 6);
    assert_eq!(s.vcpu_to_core_ratio, Some(0.19));
    assert_eq!(s.vm_to_host_ratio, Some(1.0));
}

#[test]
fn empty_cluster_renders_na() {
    let inventory = SnapshotInventory::load(inventory_file(INVENTORY).path()).unwrap();
    let s = compute_cluster_summary(&inventory, "lab", &NameFilter::default()).unwrap();

    assert_eq!(s.vm_to_host_ratio, None);
    let text = render(&s, OutputFormat::Text).unwrap();
    assert!(text.contains("N/A"));
}

#[test]
fn unknown_cluster_fails() {
    let inventory = SnapshotInventory::load(inventory_file(INVENTORY).path()).unwrap();
    let err = compute_cluster_summary(&inventory, "dr", &NameFilter::default()).unwrap_err();
    assert!(matches!(err, SizerError::ClusterNotFound { .. }));
}

#[test]
fn malformed_snapshot_reports_path() {
    let file = inventory_file("{ \"clusters\": [ ");
    let err = SnapshotInventory::load(file.path()).unwrap_err();
    assert!(matches!(err, SizerError::InventoryParse { .. }));
    assert!(err.to_string().contains(&file.path().display().to_string()));
}

#[test]
fn missing_snapshot_is_read_error() {
    let err = SnapshotInventory::load("/nonexistent/inventory.json").unwrap_err();
    assert!(matches!(err, SizerError::InventoryRead { .. }));
}

#[test]
fn misspelled_hardware_key_fails_the_load() {
    let content = INVENTORY.replacen("\"numCPU\"", "\"numCpu\"", 1);
    let err = SnapshotInventory::load(inventory_file(&content).path()).unwrap_err();
    assert!(matches!(err, SizerError::InventoryParse { .. }));
}
