pub mod admin;
pub mod avatar;
