mod account;
mod outcome;
mod signalement;
mod statut;
mod user;

pub use account::{AuthResponse, LoginRequest, MessageResponse, RegisterRequest};
pub use outcome::{ImportOutcome, StatsSnapshot, SyncReport};
pub use signalement::{Signalement, SignalementRequest, SignalementView};
pub use statut::Statut;
pub use user::{FirebaseUserView, UpdateUserRequest, User};
