pub mod audio;
pub mod game_service;
pub mod role_service;
