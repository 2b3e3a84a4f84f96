//! Core domain entities
//!
//! Session state, the resource records exchanged with the API, and the
//! error taxonomy. Pure data structures with validation logic; no I/O.

pub mod child;
pub mod envelope;
pub mod health;
pub mod nutrition;
pub mod result;
mod session;
pub mod stats;
mod user;

pub use child::{ChildDetail, ChildPayload, ChildSummary, ChildrenList, Gender, ParentStatus};
pub use envelope::{Envelope, Mutation};
pub use health::{
    Disease, HealthRecord, HealthRecordList, HealthRecordPayload, SelectedDisease, Severity,
    VaccinationStatus,
};
pub use nutrition::{bmi, NutritionPayload, NutritionRecord, NutritionRecordList, NutritionStatus};
pub use session::{AuthState, Credentials, LoginResponse, Session, SessionPhase, SessionTokens};
pub use stats::{DashboardStats, MalnutritionLevel, OrphanageStats, StatsSource};
pub use user::User;
