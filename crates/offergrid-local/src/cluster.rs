//! Simulated slaves and offer generation.

use std::collections::HashMap;

use offergrid_core::{Offer, SlaveOffer, TaskDescriptor, TaskId};
use tracing::debug;

/// One simulated worker node and the resources it has left.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulatedSlave {
    pub id: String,
    pub host: String,
    pub cpus: u64,
    pub mem: u64,
    used_cpus: u64,
    used_mem: u64,
}

impl SimulatedSlave {
    pub fn new(index: usize, cpus: u64, mem: u64) -> Self {
        Self {
            id: format!("slave-{index}"),
            host: format!("slave-{index}.local"),
            cpus,
            mem,
            used_cpus: 0,
            used_mem: 0,
        }
    }

    pub fn free_cpus(&self) -> u64 {
        self.cpus.saturating_sub(self.used_cpus)
    }

    pub fn free_mem(&self) -> u64 {
        self.mem.saturating_sub(self.used_mem)
    }

    fn has_free_resources(&self) -> bool {
        self.free_cpus() > 0 && self.free_mem() > 0
    }

    fn to_offer(&self) -> SlaveOffer {
        SlaveOffer::new(&self.id, &self.host)
            .with_resource("cpus", self.free_cpus())
            .with_resource("mem", self.free_mem())
    }
}

/// The requested amount of a resource; missing or unparseable counts as zero.
fn requested(task: &TaskDescriptor, key: &str) -> u64 {
    task.params
        .get(key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(0)
}

/// The in-process set of slaves and the tasks placed on them.
#[derive(Debug)]
pub struct LocalCluster {
    slaves: Vec<SimulatedSlave>,
    /// task → (slave index, cpus, mem) held by the task.
    placements: HashMap<TaskId, (usize, u64, u64)>,
    next_offer: u64,
}

impl LocalCluster {
    pub fn new(slaves: usize, cpus_per_slave: u64, mem_per_slave: u64) -> Self {
        Self {
            slaves: (0..slaves)
                .map(|i| SimulatedSlave::new(i, cpus_per_slave, mem_per_slave))
                .collect(),
            placements: HashMap::new(),
            next_offer: 0,
        }
    }

    pub fn slaves(&self) -> &[SimulatedSlave] {
        &self.slaves
    }

    /// Offer every slave that still has free resources.
    ///
    /// Returns `None` when nothing is free, so no empty offer is ever sent.
    pub fn make_offer(&mut self) -> Option<Offer> {
        let entries: Vec<SlaveOffer> = self
            .slaves
            .iter()
            .filter(|s| s.has_free_resources())
            .map(SimulatedSlave::to_offer)
            .collect();
        if entries.is_empty() {
            debug!("no free resources, skipping offer");
            return None;
        }
        let offer = Offer::new(format!("offer-{}", self.next_offer), entries);
        self.next_offer += 1;
        Some(offer)
    }

    pub fn offers_made(&self) -> u64 {
        self.next_offer
    }

    /// Reserve a task's resources on its slave.
    ///
    /// Fails with a reason when the slave is unknown or too small.
    pub fn place(&mut self, task: &TaskDescriptor) -> Result<(), String> {
        let index = self
            .slaves
            .iter()
            .position(|s| s.id == task.slave_id)
            .ok_or_else(|| format!("unknown slave {}", task.slave_id))?;
        let cpus = requested(task, "cpus");
        let mem = requested(task, "mem");
        let slave = &mut self.slaves[index];
        if cpus > slave.free_cpus() || mem > slave.free_mem() {
            return Err(format!(
                "task {} needs cpus={cpus} mem={mem}, slave {} has cpus={} mem={}",
                task.task_id,
                slave.id,
                slave.free_cpus(),
                slave.free_mem()
            ));
        }
        slave.used_cpus += cpus;
        slave.used_mem += mem;
        self.placements.insert(task.task_id, (index, cpus, mem));
        Ok(())
    }

    /// Give a finished task's resources back to its slave.
    pub fn release(&mut self, task_id: TaskId) {
        if let Some((index, cpus, mem)) = self.placements.remove(&task_id) {
            let slave = &mut self.slaves[index];
            slave.used_cpus = slave.used_cpus.saturating_sub(cpus);
            slave.used_mem = slave.used_mem.saturating_sub(mem);
        }
    }

    pub fn tasks_in_flight(&self) -> usize {
        self.placements.len()
    }
}
