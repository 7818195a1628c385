//! Request execution.
//!
//! Generated endpoint functions build a [`RequestDescriptor`](crate::RequestDescriptor)
//! and hand it to [`execute`] (or [`ApiClient::execute`]) together with the
//! decoder for the endpoint's response type.

mod executor;

pub use executor::{ApiClient, execute};
