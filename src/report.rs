//! Text and JSON rendering of a [`ClusterSummary`].
//!
//! Undefined values print as `N/A` in text and `null` in JSON.

use crate::error::Result;
use crate::summary::{ClusterSummary, Distribution};
use clap::ValueEnum;
use serde::Deserialize;
use std::fmt::{Display, Formatter, Result as FmtResult};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Renders `summary` in the requested format.
pub fn render(summary: &ClusterSummary, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(summary.to_string()),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(summary)?),
    }
}

const NA: &str = "N/A";

fn fmt_ratio(x: Option<f64>) -> String {
    x.map_or_else(|| NA.to_string(), |v| format!("{:.2}", v))
}
fn fmt_pct(x: Option<f64>) -> String {
    x.map_or_else(|| NA.to_string(), |v| format!("{:.2}%", v))
}
fn fmt_gb(x: f64) -> String {
    format!("{:.2} GB", x)
}
fn fmt_dist(d: Option<Distribution>, unit: &str) -> String {
    match d {
        Some(d) => format!(
            "min {:.2}{unit} / max {:.2}{unit} / avg {:.2}{unit}",
            d.min, d.max, d.average
        ),
        None => NA.to_string(),
    }
}

impl Display for ClusterSummary {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        writeln!(f, "Cluster: {}", self.cluster)?;
        writeln!(f)?;

        writeln!(f, "Hosts:                    {}", self.total_hosts)?;
        writeln!(
            f,
            "VMs:                      {} ({} powered on, {} inactive)",
            self.total_vms, self.powered_on_vms, self.inactive_vms
        )?;
        writeln!(
            f,
            "VMs per host:             {}",
            fmt_ratio(self.vm_to_host_ratio)
        )?;
        writeln!(f)?;

        writeln!(f, "Physical cores:           {}", self.total_host_cpu_cores)?;
        writeln!(f, "vCPU (all VMs):           {}", self.total_vcpu_all)?;
        writeln!(f, "vCPU (powered on):        {}", self.total_vcpu_powered_on)?;
        writeln!(
            f,
            "vCPU per core:            {}",
            fmt_ratio(self.vcpu_to_core_ratio)
        )?;
        writeln!(
            f,
            "CPU overcommit:           {}",
            fmt_pct(self.cpu_overcommit_percent)
        )?;
        writeln!(f)?;

        writeln!(f, "Host memory:              {}", fmt_gb(self.host_mem_gb))?;
        writeln!(f, "vMemory (all VMs):        {}", fmt_gb(self.vmem_all_gb))?;
        writeln!(
            f,
            "vMemory (powered on):     {}",
            fmt_gb(self.powered_on_mem_gb)
        )?;
        writeln!(
            f,
            "vMemory per host memory:  {}",
            fmt_ratio(self.mem_to_host_ratio)
        )?;
        writeln!(
            f,
            "Memory overcommit:        {}",
            fmt_pct(self.mem_overcommit_percent)
        )?;
        writeln!(f)?;

        writeln!(f, "vDisk (powered on):       {}", fmt_gb(self.vdisk_gb))?;
        writeln!(f)?;

        writeln!(f, "Per powered-on VM:")?;
        writeln!(
            f,
            "  vCPU:    {}",
            fmt_dist(self.vcpu_distribution, "")
        )?;
        writeln!(
            f,
            "  vMemory: {}",
            fmt_dist(self.vmem_gb_distribution, " GB")
        )?;
        writeln!(
            f,
            "  vDisk:   {}",
            fmt_dist(self.vdisk_gb_distribution, " GB")
        )?;

        Ok(())
    }
}
