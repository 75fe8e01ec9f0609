//! Domain models shared by repositories, services and API handlers

pub mod book;
pub mod borrow;
pub mod category;
pub mod rating;
pub mod settings;
pub mod user;
