pub mod login;
pub mod staff;
pub mod store_access;
pub mod templates;
