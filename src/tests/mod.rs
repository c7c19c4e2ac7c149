//! Integration tests for the aggregating client.
//!
//! Cases drive a [`Client`](crate::Client) over scripted providers with
//! injected latency and failures, and over real memory providers.

mod cases_client_write_test;

pub mod support;
