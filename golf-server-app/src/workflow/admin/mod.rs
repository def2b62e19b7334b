pub mod bootstrap;
pub mod get_admin;
pub mod login;
