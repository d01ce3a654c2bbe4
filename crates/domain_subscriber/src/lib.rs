//! Subscriber Domain
//!
//! API users who may manage policies and request quotes: registration with a
//! bcrypt-hashed password and email/password verification for login.

pub mod error;
pub mod ports;
pub mod services;
pub mod subscriber;

pub use error::SubscriberError;
pub use ports::{memory, SubscriberStore};
pub use services::SubscriberService;
pub use subscriber::{normalize_email, NewSubscriber, RegisterSubscriber, Subscriber};
