pub mod auth;
pub mod custom_field;
pub mod dashboard;
pub mod visitor;
