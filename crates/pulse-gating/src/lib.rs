//! # Pulse Gating
//!
//! Whether an inbound action may proceed at all:
//!
//! - **RequestGovernor**: per-key fixed-window admission control with
//!   exponential-backoff blocking. The fast abuse gate every action passes
//!   first.
//! - **SessionScheduler**: per-player cooldown and daily-cap gate for
//!   starting a new play session, plus idle-session expiry.
//!
//! Both components return decision values for ordinary rejections; only
//! misconfiguration is an error, and only at construction. Content
//! scanning (SQL/XSS patterns) is a separate upstream collaborator and is
//! not part of this crate.

pub mod governor;
pub mod scheduler;

pub use governor::*;
pub use scheduler::*;
