//! [`Command`] definition.

pub mod authorize_user_session;
pub mod create_feedback;
pub mod create_user_session;
pub mod delete_feedback;
pub mod subscribe_newsletter;
pub mod update_feedback;

/// [`Command`] of the [`Service`].
///
/// [`Service`]: crate::Service
pub use common::Handler as Command;

pub use self::{
    authorize_user_session::AuthorizeUserSession,
    create_feedback::CreateFeedback, create_user_session::CreateUserSession,
    delete_feedback::DeleteFeedback,
    subscribe_newsletter::SubscribeNewsletter,
    update_feedback::UpdateFeedback,
};
