pub mod access;
pub mod auth;
pub mod custom_field_service;
pub mod dashboard_service;
pub mod photo_storage;
pub mod visitor_service;
