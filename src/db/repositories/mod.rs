pub mod chat;
pub mod city;
pub mod user;
