//! CheckIP allocation.
//!
//! Every WAN link and VPN client gets a public resolver address used as its
//! liveness probe: a host route pins the address to that link, recursive
//! default routes check it with `check-gateway=ping`, and the DNS forwarder
//! group of the link's network queries it, so DNS for a network follows the
//! same links its health checks do.
//!
//! Assignment rule, for `d` Domestic links, `f` Foreign links and `v` VPN
//! clients, each in input order:
//!
//! - Domestic links: `DOMESTIC_POOL[0..d)`
//! - Foreign links: `FOREIGN_POOL[0..f)`
//! - VPN clients: `FOREIGN_POOL[f..f+v)`
//!
//! [`allocate`] is the only place this arithmetic lives. Builders receive a
//! [`CheckIpPlan`] computed from [`Counts::of`] and look addresses up by
//! index; none of them slices a pool on its own.

use std::net::Ipv4Addr;
use std::ops::Range;

use serde::Serialize;
use thiserror::Error;

use crate::topology::{NetworkKind, Topology, WanCategory};

/// Probe addresses for Domestic WAN links.
pub const DOMESTIC_POOL: &[Ipv4Addr] = &[
    Ipv4Addr::new(178, 22, 122, 100),
    Ipv4Addr::new(185, 51, 200, 2),
    Ipv4Addr::new(78, 157, 42, 100),
    Ipv4Addr::new(78, 157, 42, 101),
    Ipv4Addr::new(185, 55, 226, 26),
    Ipv4Addr::new(185, 55, 225, 25),
    Ipv4Addr::new(217, 218, 127, 127),
    Ipv4Addr::new(217, 218, 155, 155),
    Ipv4Addr::new(194, 225, 152, 10),
    Ipv4Addr::new(91, 99, 101, 12),
];

/// Probe addresses for Foreign WAN links, followed by VPN clients.
pub const FOREIGN_POOL: &[Ipv4Addr] = &[
    Ipv4Addr::new(1, 1, 1, 1),
    Ipv4Addr::new(8, 8, 8, 8),
    Ipv4Addr::new(9, 9, 9, 9),
    Ipv4Addr::new(1, 0, 0, 1),
    Ipv4Addr::new(8, 8, 4, 4),
    Ipv4Addr::new(149, 112, 112, 112),
    Ipv4Addr::new(208, 67, 222, 222),
    Ipv4Addr::new(208, 67, 220, 220),
    Ipv4Addr::new(94, 140, 14, 14),
    Ipv4Addr::new(94, 140, 15, 15),
    Ipv4Addr::new(76, 76, 2, 0),
    Ipv4Addr::new(76, 76, 10, 0),
    Ipv4Addr::new(185, 228, 168, 9),
    Ipv4Addr::new(185, 228, 169, 9),
    Ipv4Addr::new(64, 6, 64, 6),
    Ipv4Addr::new(64, 6, 65, 6),
];

/// Number of members per category; the sole input of [`allocate`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Counts {
    pub domestic: usize,
    pub foreign: usize,
    pub vpn: usize,
}

impl Counts {
    /// Count the members of each category in `topology`.
    pub fn of(topology: &Topology) -> Self {
        Self {
            domestic: topology.wan.domestic.len(),
            foreign: topology.wan.foreign.len(),
            vpn: topology.vpn.len(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AllocationError {
    #[error("CheckIP pool '{pool}' has {available} addresses but {requested} are needed")]
    PoolExhausted {
        pool: &'static str,
        requested: usize,
        available: usize,
    },
}

/// Result of [`allocate`]: index ranges into the two pools.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckIpPlan {
    counts: Counts,
    domestic: Range<usize>,
    foreign: Range<usize>,
    vpn: Range<usize>,
}

/// Compute the CheckIP assignment for the given counts.
pub fn allocate(counts: Counts) -> Result<CheckIpPlan, AllocationError> {
    if counts.domestic > DOMESTIC_POOL.len() {
        return Err(AllocationError::PoolExhausted {
            pool: "domestic",
            requested: counts.domestic,
            available: DOMESTIC_POOL.len(),
        });
    }
    let foreign_end = counts.foreign + counts.vpn;
    if foreign_end > FOREIGN_POOL.len() {
        return Err(AllocationError::PoolExhausted {
            pool: "foreign",
            requested: foreign_end,
            available: FOREIGN_POOL.len(),
        });
    }
    Ok(CheckIpPlan {
        counts,
        domestic: 0..counts.domestic,
        foreign: 0..counts.foreign,
        vpn: counts.foreign..foreign_end,
    })
}

/// Shorthand for `allocate(Counts::of(topology))`.
pub fn plan_for(topology: &Topology) -> Result<CheckIpPlan, AllocationError> {
    allocate(Counts::of(topology))
}

impl CheckIpPlan {
    pub fn counts(&self) -> Counts {
        self.counts
    }

    /// Pool a network draws its probes from.
    pub fn pool(kind: NetworkKind) -> &'static [Ipv4Addr] {
        match kind {
            NetworkKind::Domestic => DOMESTIC_POOL,
            NetworkKind::Foreign | NetworkKind::Vpn => FOREIGN_POOL,
        }
    }

    /// Index range inside [`CheckIpPlan::pool`] assigned to `kind`.
    pub fn range(&self, kind: NetworkKind) -> Range<usize> {
        match kind {
            NetworkKind::Vpn => self.vpn.clone(),
            NetworkKind::Domestic => self.domestic.clone(),
            NetworkKind::Foreign => self.foreign.clone(),
        }
    }

    /// Addresses assigned to the members of `kind`, in input order.
    pub fn assigned(&self, kind: NetworkKind) -> &'static [Ipv4Addr] {
        let pool = Self::pool(kind);
        pool.get(self.range(kind)).unwrap_or(&[])
    }

    pub fn domestic(&self) -> &'static [Ipv4Addr] {
        self.assigned(NetworkKind::Domestic)
    }

    pub fn foreign(&self) -> &'static [Ipv4Addr] {
        self.assigned(NetworkKind::Foreign)
    }

    pub fn vpn(&self) -> &'static [Ipv4Addr] {
        self.assigned(NetworkKind::Vpn)
    }

    /// Probe of the WAN link at `index` within its category.
    pub fn for_wan(&self, category: WanCategory, index: usize) -> Option<Ipv4Addr> {
        self.assigned(category.network()).get(index).copied()
    }

    /// Probe of the VPN client at `index`.
    pub fn for_vpn(&self, index: usize) -> Option<Ipv4Addr> {
        self.vpn().get(index).copied()
    }

    /// Addresses a network's DNS forwarder group queries.
    ///
    /// A network with no members falls back to the first address of its
    /// pool so the group can still be emitted; the fallback is never
    /// assigned to a link.
    pub fn probes(&self, kind: NetworkKind) -> &'static [Ipv4Addr] {
        let assigned = self.assigned(kind);
        if !assigned.is_empty() {
            return assigned;
        }
        let pool = Self::pool(kind);
        &pool[..pool.len().min(1)]
    }
}
