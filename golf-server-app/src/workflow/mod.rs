pub mod admin;
pub mod game;
pub mod player;
pub mod reporting;
