pub mod auth;
pub mod custom_fields;
pub mod dashboard;
pub mod photos;
pub mod public;
pub mod users;
pub mod visitors;
