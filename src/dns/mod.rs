mod mijnhost;
mod provider;

pub use mijnhost::MijnHostProvider;
pub use provider::{DnsProvider, DnsRecord, RecordType};
