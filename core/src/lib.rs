//! Async request gateway for the Nullam event registration API.
//!
//! # Overview
//! `Gateway` wraps one base URL and exposes `get`, `post`, `put` and
//! `delete`. Each call sends exactly one request through a `Transport` and
//! resolves to the decoded JSON body, or fails with `ApiError::Http` when
//! the status is outside 200..=299. `EventsApi` layers the typed `/events`
//! endpoints on top.
//!
//! # Design
//! - `Gateway` holds only `base_url` and its transport; it is `Clone` and
//!   can be shared across tasks without locking.
//! - Requests are built as plain data (`build_*`) before they are sent, so
//!   the I/O boundary stays explicit and hosts can run their own I/O.
//! - A single private response handler serves all four verbs.
//! - No retries, timeouts, caching or authentication.

pub mod config;
pub mod error;
pub mod events;
pub mod gateway;
pub mod http;
pub mod transport;
pub mod types;

pub use config::GatewayConfig;
pub use error::{ApiError, Result};
pub use events::EventsApi;
pub use gateway::Gateway;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use transport::{ReqwestTransport, Transport};
pub use types::{
    CompanyParticipationDto, EventDto, EventSummaryDto, ParticipantSummaryDto,
    ParticipationType, PaymentMethod, PersonParticipationDto, ValidationResult,
};
