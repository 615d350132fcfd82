pub mod auth;
pub mod families;
pub mod join_requests;
pub mod members;
pub mod relationships;
pub mod root;
pub mod tree;
