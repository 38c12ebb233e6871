//! Data models for ShareIt

pub mod booking;
pub mod item;
pub mod page;
pub mod user;
