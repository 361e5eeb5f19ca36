pub mod openai;
pub mod openweather;
