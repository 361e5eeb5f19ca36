pub mod auth_service;
pub mod auth_service_impl;
pub use auth_service::{AuthError, AuthService, UserInfo};
pub use auth_service_impl::SeaOrmAuthService;

pub mod city_service;
pub mod city_service_impl;
pub use city_service::{CityDto, CityError, CityService};
pub use city_service_impl::SeaOrmCityService;

pub mod weather_service;
pub use weather_service::{WeatherError, WeatherProvider};

pub mod chat_service;
pub use chat_service::{ChatOutcome, ChatService, CompletionError, CompletionProvider};
