//! Editorial workflow core: status enums, permission predicates, transition
//! tables, and the publish precondition aggregator. Everything in this
//! module is pure — no I/O, no storage access. The executors in
//! `crate::models::*::workflow` apply these rules against the database.

pub mod permissions;
pub mod publish;
pub mod status;
pub mod transitions;

pub use permissions::{can, gate_allows, Action, ActionContext, Gate, GateContext};
pub use status::{BulletinStatus, ReturnStage, StaffRole, StoryStatus, TranslationStatus};
