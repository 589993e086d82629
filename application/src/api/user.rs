//! [`User`]-related definitions.

use common::DateTime;
use derive_more::From;
use juniper::graphql_object;
use service::domain;

use crate::Context;

/// A signed-in visitor.
#[derive(Clone, Debug, From)]
pub struct User(domain::User);

/// A signed-in visitor.
#[graphql_object(context = Context)]
impl User {
    /// Display name of this `User`.
    pub fn name(&self) -> String {
        self.0.name.to_string()
    }

    /// Email address of this `User`.
    pub fn email(&self) -> String {
        self.0.email.to_string()
    }

    /// Avatar URL of this `User`, if any.
    pub fn picture(&self) -> Option<String> {
        self.0.picture.as_ref().map(ToString::to_string)
    }
}

/// Result of a successful sign-in.
#[derive(Clone, Debug)]
pub struct SessionPayload {
    /// Issued session token.
    pub token: String,

    /// Signed-in [`User`].
    pub user: User,

    /// `DateTime` when the session expires.
    pub expires_at: DateTime,
}

/// Result of a successful sign-in.
#[graphql_object(context = Context)]
impl SessionPayload {
    /// Issued session token.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Signed-in `User`.
    pub fn user(&self) -> User {
        self.user.clone()
    }

    /// `DateTime` when the session expires.
    pub fn expires_at(&self) -> DateTime {
        self.expires_at
    }
}
