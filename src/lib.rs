//! slxmppd - Straylight XMPP Daemon
//!
//! Roster management and presence-subscription bookkeeping for an XMPP
//! server. Transports parse stanzas into [`slxmpp_proto::Element`] trees,
//! bind sessions through [`state::Matrix::open_session`] and hand each IQ to
//! [`handlers::Registry::dispatch_element`].

pub mod config;
pub mod error;
pub mod handlers;
pub mod http;
pub mod metrics;
pub mod routing;
pub mod state;
pub mod storage;
pub mod telemetry;
