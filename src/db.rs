pub mod store;
pub use store::{CustomFieldStore, UserStore, VisitorStore};
pub mod visitor_repo;
pub use visitor_repo::VisitorRepository;
pub mod custom_field_repo;
pub use custom_field_repo::CustomFieldRepository;
pub mod user_repo;
pub use user_repo::UserRepository;

#[cfg(test)]
pub mod memory;
