pub mod health;
pub mod phone_auth;
