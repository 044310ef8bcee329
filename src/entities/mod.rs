pub mod favorite_game;
pub mod game;
pub mod game_session;
pub mod message;
pub mod rsvp;
pub mod session_game;
pub mod user;
pub mod verification_token;
