//! Client adapters for external government services (IRS, SSA, DMV, USPS).
//!
//! Each adapter exposes normalized domain operations over one agency's
//! HTTP API and shares a single control flow: ensure a valid credential,
//! call the remote endpoint with an explicit deadline, write the raw
//! payload through to the cache, persist normalized records, and return
//! the transformed response. Read operations degrade to a fresh cache
//! entry when the live call fails; mutations never do.

pub mod call;
pub mod dmv;
pub mod error;
pub mod irs;
pub mod oauth;
pub mod responses;
pub mod ssa;
pub mod sync;
pub mod transform;
pub mod usps;

pub use dmv::{AccommodationChange, DmvClient};
pub use error::AgencyError;
pub use irs::IrsClient;
pub use responses::{DmvApiResponse, IrsApiResponse, SsaApiResponse, UspsApiResponse};
pub use ssa::SsaClient;
pub use sync::{StateLicense, SyncReport, SyncRunner, UserProfile};
pub use usps::UspsClient;
