pub mod face;
pub mod health;
pub mod login;
pub mod register;
pub mod unlock;
pub mod users;
pub mod voice;
