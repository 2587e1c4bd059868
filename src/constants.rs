//! # Protocol Constants - Instance Identification Core Constants
//!
//! ## Purpose
//!
//! Central registry of protocol-level constants shared by the codec and by any
//! service gluing it onto an HTTP stack. These values define the wire contract
//! and must remain stable for interoperability between services that exchange
//! call-graph instance ids.

/// HTTP header name carrying instance identification values
///
/// Both the call-graph identifier (`Ciid` canonical string) and the
/// authorization/options sub-protocol (`IidRequest` canonical string) travel
/// under this header name by convention of the surrounding service.
pub const X_INSTANCE_ID: &str = "X-Instance-Id";
