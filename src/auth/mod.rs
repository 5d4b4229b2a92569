pub mod identity;
pub mod ownership;
pub mod password;
pub mod token;

pub use identity::AuthUser;
pub use ownership::ensure_post_owner;
pub use token::{Claims, TokenKeys};
