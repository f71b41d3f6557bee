// SPDX-FileCopyrightText: 2026 Rolebridge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP gateway for rolebridge.
//!
//! Serves the browser shell and static assets, the streaming translation
//! endpoint, and the role detection endpoint. Validation failures are
//! reported as `{"error": ...}` bodies with status 200; upstream failures
//! during a translation arrive as an error frame inside the event stream.

pub mod handlers;
pub mod server;
pub mod sse;

pub use server::{GatewayState, router, start_server};
