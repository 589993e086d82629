//! GraphQL API definitions.

pub mod feedback;
mod mutation;
mod query;
pub mod tour;
pub mod user;

use crate::define_error;

pub use self::{
    feedback::{Review, Stats},
    mutation::Mutation,
    query::Query,
    tour::Tour,
    user::User,
};

/// GraphQL schema.
pub type Schema = juniper::RootNode<
    'static,
    Query,
    Mutation,
    juniper::EmptySubscription<crate::Context>,
>;

define_error! {
    enum ValidationError {
        #[code = "INVALID_INPUT"]
        #[status = BAD_REQUEST]
        #[message = "Provided input is invalid"]
        InvalidInput,
    }
}
