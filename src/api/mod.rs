//! Resource modules: one backend resource each, mapped onto [`ApiClient`].
//!
//! DESIGN
//! ======
//! These are thin request/response mappers. They never catch errors: every
//! failure propagates to the page model or session that issued the call.
//! Path builders are plain functions so their shapes are unit-testable
//! without a backend.
//!
//! [`ApiClient`]: crate::http::ApiClient

pub mod auth;
pub mod dashboard;
pub mod events;
pub mod goals;
pub mod logs;
pub mod points;
pub mod projects;
pub mod steps;
pub mod users;
