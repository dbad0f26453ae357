//! Data core for a clan-roster and attendance tracker.
//!
//! The crate owns two concerns an embedding shell (mobile or desktop UI)
//! builds on top of:
//!
//! - [`db`] — the on-device SQLite store: connection lifecycle, forward-only
//!   schema migrations, and typed CRUD over clans and members, including the
//!   single-leader-per-clan transition.
//! - [`remote`] — a thin client for the spreadsheet-backed roster service,
//!   an alternate data source the shell may select instead of the local
//!   store. The local store never depends on it.

pub mod db;
pub mod error;
pub mod models;
pub mod remote;

pub use db::{RosterDb, RosterQueries};
pub use error::{RosterError, RosterErrorCode, RosterResult};
pub use models::{Clan, Member, MemberStatus, NewMember, StatProfile, LEADER_ROLE};
