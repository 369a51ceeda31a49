pub mod config;
pub mod cookies;
pub mod directory;
pub mod error;
pub mod guard;
pub mod layout;
pub mod paths;
pub mod resolver;
pub mod role;
pub mod state;
pub mod token;
pub mod user;

pub use config::DirectoryConfig;
pub use directory::{InMemoryUserDirectory, RestUserDirectory, UserDirectory};
pub use error::DirectoryError;
pub use guard::{route_guard, GuardDecision};
pub use layout::{layout_view, LayoutView, RoleGatedLayout};
pub use resolver::{decide_navigation, Navigation, SessionResolver};
pub use role::Role;
pub use state::{Session, SessionState};
pub use token::normalize_identity_token;
pub use user::UserRecord;

pub mod prelude {
    //! Re-exports of the most commonly used session types.
    pub use crate::{Navigation, Role, RoleGatedLayout, SessionResolver, UserRecord};
}
