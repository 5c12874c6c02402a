//! # Shared HTTP
//!
//! The authenticated request pipeline every feature cell talks to the API
//! through. A call is described by a [`CallConfig`], executed against an
//! [`HttpTransport`], and decoded according to an explicit [`CallMode`].
//!
//! ```text
//! CallConfig --> RequestPipeline --(headers + bearer)--> HttpTransport
//!                      |                                      |
//!                      +<------ decode (CallMode) <-----------+
//! ```

pub mod pipeline;
pub mod transport;

pub use pipeline::{CallConfig, CallMode, CallOutcome, RequestPipeline, TOKEN_FIELD};
pub use transport::{HttpTransport, OutboundRequest, ReqwestTransport, TransportResponse};
