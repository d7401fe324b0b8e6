//! # asotobase
//!
//! Async client for the asotobase community platform: personal goals and
//! steps, reflection logs, community events, collaborative projects and the
//! points ledger, all served by one REST backend.
//!
//! SYSTEM CONTEXT
//! ==============
//! `http::ApiClient` is the only component that talks to the network. The
//! resource modules under `api` map one backend resource each onto it, the
//! `session` service drives login/register/logout/restore, and `guard`
//! decides which locations a caller may visit given the stored token.
//! `pages` holds headless page models that compose all of the above the way
//! a UI screen would.

pub mod api;
pub mod config;
pub mod error;
pub mod forms;
pub mod guard;
pub mod http;
pub mod models;
pub mod pages;
pub mod session;
pub mod storage;

pub use config::ClientConfig;
pub use error::ApiError;
pub use http::ApiClient;
pub use session::{Session, SessionState};
