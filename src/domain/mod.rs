pub mod account;
pub mod movement;

pub use account::{Account, AuthGrant};
pub use movement::{Movement, MovementDraft, MovementKind};
