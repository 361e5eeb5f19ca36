pub use super::chats::Entity as Chats;
pub use super::cities::Entity as Cities;
pub use super::users::Entity as Users;
