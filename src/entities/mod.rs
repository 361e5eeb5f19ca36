pub mod prelude;

pub mod chats;
pub mod cities;
pub mod users;
