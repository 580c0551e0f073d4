pub mod contact_repo;
pub mod method_repo;
pub mod schema;
