//! RouterOS multi-WAN configuration generator.
//!
//! Turns a declarative topology (WAN uplinks split into Domestic and Foreign
//! classes, VPN clients, LAN subnets, router services) into one RouterOS
//! script whose health checks, routing marks, DNS forwarders and mangle
//! rules agree with each other.
//!
//! # Architecture
//!
//! ## Input
//!
//! - [`topology`]: Topology model, TOML/JSON loading
//! - [`validate`]: Whole-topology validation report
//! - [`error`]: Entity-scoped build errors
//!
//! ## Shared derivations
//!
//! - [`checkip`]: The CheckIP allocator; the only place probe addresses are
//!   assigned
//! - [`naming`]: Interface, routing table, mark and list names
//! - [`command`]: RouterOS command line builder
//! - [`section`]: Command-tree paths and their emission order
//!
//! ## Builders
//!
//! - [`wan`]: Per-link routing tables, CheckIP and recursive default routes
//! - [`vpn`]: One builder per VPN protocol plus the shared base fragment
//! - [`subnets`]: LAN subnet steering into network tables
//! - [`dns`]: Per-network DNS forwarder groups
//! - [`services`]: `/ip service` settings and reply-path mangle rules
//!
//! ## Assembly and output
//!
//! - [`generate`]: Folds every fragment in VPN, Domestic, Foreign order
//! - [`report`]: Terminal rendering of allocations, summaries and reports
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//!
//! use ros_confgen::generate::generate;
//! use ros_confgen::topology::load_topology;
//!
//! let topology = load_topology(Path::new("topology.toml"))?;
//! let generation = generate(&topology)?;
//! print!("{}", ros_script::write(&generation.document));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod checkip;
pub mod command;
pub mod dns;
pub mod error;
pub mod generate;
pub mod naming;
pub mod report;
pub mod section;
pub mod services;
pub mod subnets;
pub mod topology;
pub mod validate;
pub mod vpn;
pub mod wan;
