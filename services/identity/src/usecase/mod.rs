pub mod face;
pub mod login;
pub mod otp;
pub mod password;
pub mod proof;
pub mod register;
pub mod token;
pub mod unlock;
pub mod user;
pub mod voice;
