//! Keeps mijn.host A/AAAA records pointed at the host's current public address.
//!
//! A pass resolves the public IPv4/IPv6 address, fetches the domain's records,
//! diffs them against the configured record names and pushes the minimal set
//! of creates and updates.

pub mod config;
pub mod daemon;
pub mod dns;
pub mod error;
pub mod ip;
pub mod reconcile;

pub const USER_AGENT: &str = concat!("mijnhost-ddns/", env!("CARGO_PKG_VERSION"));
