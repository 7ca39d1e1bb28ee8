//! Name-based selection of the VMs that take part in a summary.

use crate::inventory::VmRecord;
use std::collections::BTreeSet;
use tracing::{debug, warn};

/// Allow-list and deny-list over VM names.
///
/// An empty set means "not provided". The include list is applied first and
/// the exclude list last, so a name present in both is always removed.
/// Names that match no VM are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameFilter {
    include: BTreeSet<String>,
    exclude: BTreeSet<String>,
}

impl NameFilter {
    pub fn new<I, E, S, T>(include: I, exclude: E) -> Self
    where
        I: IntoIterator<Item = S>,
        E: IntoIterator<Item = T>,
        S: Into<String>,
        T: Into<String>,
    {
        Self {
            include: include.into_iter().map(Into::into).collect(),
            exclude: exclude.into_iter().map(Into::into).collect(),
        }
    }

    /// True when the filter passes every VM through.
    pub fn is_pass_through(&self) -> bool {
        self.include.is_empty() && self.exclude.is_empty()
    }

    /// Returns the working VM set, preserving inventory order.
    pub fn apply(&self, vms: Vec<VmRecord>) -> Vec<VmRecord> {
        if self.is_pass_through() {
            return vms;
        }
        self.report_unmatched(&vms);

        let before = vms.len();
        let kept: Vec<VmRecord> = vms
            .into_iter()
            .filter(|vm| self.include.is_empty() || self.include.contains(&vm.name))
            .filter(|vm| !self.exclude.contains(&vm.name))
            .collect();
        debug!(before, after = kept.len(), "applied vm name filter");
        kept
    }

    fn report_unmatched(&self, vms: &[VmRecord]) {
        let known: BTreeSet<&str> = vms.iter().map(|vm| vm.name.as_str()).collect();
        for name in self.include.iter().chain(&self.exclude) {
            if !known.contains(name.as_str()) {
                warn!(vm = %name, "filter name matches no vm in inventory");
            }
        }
    }
}
