pub mod db;
pub mod face;
pub mod voice;
