//! Domain definitions.

pub mod content;
pub mod feedback;
pub mod inquiry;
pub mod subscriber;
pub mod tour;
pub mod user;

pub use self::{
    feedback::Feedback, inquiry::Inquiry, subscriber::Email, tour::Tour,
    user::User,
};
