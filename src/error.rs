//! Error types shared by the resolver, provider and reconciliation pass.

use thiserror::Error;

use crate::ip::AddressFamily;

/// Failure talking to the DNS provider API.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("authentication rejected by provider ({status}): {body}")]
    Authentication { status: u16, body: String },

    #[error("provider API error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("request to provider failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("malformed provider response: {0}")]
    Decode(String),
}

/// Failure resolving the public address of one family.
#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("no lookup endpoints configured for {0}")]
    NoEndpoints(AddressFamily),

    #[error("lookup request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("lookup response from {url} is not an IP address: {body:?}")]
    Malformed { url: String, body: String },

    #[error("lookup response from {url} is {found}, expected {expected}")]
    WrongFamily {
        url: String,
        expected: AddressFamily,
        found: AddressFamily,
    },

    #[error("all {family} lookup endpoints failed, last error: {last}")]
    Exhausted {
        family: AddressFamily,
        last: Box<ResolveError>,
    },
}

/// Failure that aborts a whole reconciliation pass.
#[derive(Error, Debug)]
pub enum PassError {
    #[error("no public address could be resolved for any family")]
    NoAddress,

    #[error("failed to fetch DNS records for {domain}: {source}")]
    Fetch {
        domain: String,
        #[source]
        source: ProviderError,
    },
}
