pub mod auth_service;
pub mod game_service;
pub mod message_service;
pub mod rsvp_service;
pub mod session_service;
pub mod user_service;

pub use auth_service::AuthService;
pub use game_service::GameService;
pub use message_service::MessageService;
pub use rsvp_service::RsvpService;
pub use session_service::SessionService;
pub use user_service::UserService;
