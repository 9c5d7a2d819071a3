pub mod event;
pub mod game;
pub mod team;
pub mod token;
