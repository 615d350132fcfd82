pub mod family;
pub mod family_tree;
pub mod join_request;
pub mod member;
pub mod relationship;
pub mod user;

pub use family::*;
pub use family_tree::*;
pub use join_request::*;
pub use member::*;
pub use relationship::*;
pub use user::*;
