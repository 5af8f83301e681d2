//! Capacity-bounded resource pool with a priority wait queue
//!
//! Waiters are ordered by `(priority, ticket)`: a lower priority number is
//! more urgent, and the monotonically increasing ticket keeps requests of
//! equal priority first-come first-served. A pool never evicts a holder;
//! priority only decides who is served next.

use crate::simulation::{SimulationError, SimulationResult};
use crate::types::{ProcessId, ResourceKind, SimulationConfig};
use std::collections::BTreeMap;

/// Priority used by patient requests
pub const NORMAL_PRIORITY: i32 = 1;

/// Priority used by scheduled unavailability, served ahead of any patient
pub const DISRUPTION_PRIORITY: i32 = -1;

/// A capacity-limited resource such as the ward or the scanner
#[derive(Debug, Clone)]
pub struct ResourcePool {
    kind: ResourceKind,
    capacity: usize,
    holders: Vec<ProcessId>,
    queue: BTreeMap<(i32, u64), ProcessId>,
    next_ticket: u64,
}

impl ResourcePool {
    /// Create an empty pool
    pub fn new(kind: ResourceKind, capacity: usize) -> Self {
        Self { kind, capacity, holders: Vec::with_capacity(capacity), queue: BTreeMap::new(), next_ticket: 0 }
    }

    /// Resource this pool models
    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    /// Maximum number of simultaneous holders
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of slots currently granted
    pub fn in_use(&self) -> usize {
        self.holders.len()
    }

    /// Number of waiting requests
    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    /// Whether every slot is granted
    pub fn is_full(&self) -> bool {
        self.holders.len() >= self.capacity
    }

    /// Whether `who` currently holds a slot
    pub fn holds(&self, who: ProcessId) -> bool {
        self.holders.contains(&who)
    }

    /// Request a slot for `who`
    ///
    /// Returns `true` when the slot is granted on the spot, which happens only
    /// if a slot is free and nobody is already waiting. Otherwise the request
    /// joins the queue and is granted later by [`ResourcePool::release`].
    pub fn request(&mut self, who: ProcessId, priority: i32) -> SimulationResult<bool> {
        if !self.is_full() && self.queue.is_empty() {
            self.grant(who)?;
            return Ok(true);
        }
        let ticket = self.next_ticket;
        self.next_ticket += 1;
        self.queue.insert((priority, ticket), who);
        Ok(false)
    }

    /// Release the slot held by `who`
    ///
    /// The freed slot goes straight to the most urgent waiter, whose identity
    /// is returned so the caller can resume it in the same instant.
    pub fn release(&mut self, who: ProcessId) -> SimulationResult<Option<ProcessId>> {
        let position = self.holders.iter().position(|&holder| holder == who).ok_or_else(|| {
            SimulationError::invariant_violation(format!(
                "{} released the {} pool without holding it",
                who, self.kind
            ))
        })?;
        self.holders.swap_remove(position);

        match self.queue.pop_first() {
            Some((_, next)) => {
                self.grant(next)?;
                Ok(Some(next))
            }
            None => Ok(None),
        }
    }

    fn grant(&mut self, who: ProcessId) -> SimulationResult<()> {
        if self.holders.len() >= self.capacity {
            return Err(SimulationError::invariant_violation(format!(
                "{} pool granted beyond capacity {} to {}",
                self.kind, self.capacity, who
            )));
        }
        self.holders.push(who);
        Ok(())
    }
}

/// The four pools of a run
#[derive(Debug, Clone)]
pub struct ResourcePools {
    staffing: ResourcePool,
    scanner: ResourcePool,
    same_day_care: ResourcePool,
    ward: ResourcePool,
}

impl ResourcePools {
    /// Build the pools sized from a configuration
    pub fn from_config(config: &SimulationConfig) -> Self {
        Self {
            staffing: ResourcePool::new(ResourceKind::Staffing, config.staffing_capacity),
            scanner: ResourcePool::new(ResourceKind::Scanner, config.scanner_capacity),
            same_day_care: ResourcePool::new(ResourceKind::SameDayCare, config.same_day_care_capacity),
            ward: ResourcePool::new(ResourceKind::Ward, config.ward_capacity),
        }
    }

    /// Pool for a resource
    pub fn get(&self, kind: ResourceKind) -> &ResourcePool {
        match kind {
            ResourceKind::Staffing => &self.staffing,
            ResourceKind::Scanner => &self.scanner,
            ResourceKind::SameDayCare => &self.same_day_care,
            ResourceKind::Ward => &self.ward,
        }
    }

    /// Mutable pool for a resource
    pub fn get_mut(&mut self, kind: ResourceKind) -> &mut ResourcePool {
        match kind {
            ResourceKind::Staffing => &mut self.staffing,
            ResourceKind::Scanner => &mut self.scanner,
            ResourceKind::SameDayCare => &mut self.same_day_care,
            ResourceKind::Ward => &mut self.ward,
        }
    }
}
