pub mod auth;
pub mod companies;
pub mod health;
pub mod messages;
pub mod reviews;
pub mod users;
