// ABOUTME: HTTP route handlers for the extraction service.
// ABOUTME: Health check, product extraction, and the JSON 404 fallback.

pub mod extract;
pub mod health;

pub use extract::*;
pub use health::*;
