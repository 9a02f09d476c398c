//! # Generic Messages
//!
//! The request envelope exchanged between `ResourceClient` and `ResourceActor`.

use crate::entity::ActorEntity;
use crate::error::FrameworkError;
use tokio::sync::oneshot;

/// One-shot reply channel for a request against entity type `T` producing `R`.
pub type Response<T, R> = oneshot::Sender<Result<R, FrameworkError<<T as ActorEntity>::Error>>>;

/// Internal message type sent to the actor to request operations.
///
/// The variants follow a resource-oriented shape: `Create`, `Get`, `List` and `Update` cover
/// the generic lifecycle, `Action` carries the resource-specific operations
/// ([`ActorEntity::Action`]). There is no delete: stored resources here are retained for
/// history and retired through their own state instead.
#[derive(Debug)]
pub enum ResourceRequest<T: ActorEntity> {
    Create {
        params: T::Create,
        respond_to: Response<T, T::Id>,
    },
    Get {
        id: T::Id,
        respond_to: Response<T, Option<T>>,
    },
    List {
        respond_to: Response<T, Vec<T>>,
    },
    Update {
        id: T::Id,
        update: T::Update,
        respond_to: Response<T, T>,
    },
    Action {
        id: T::Id,
        action: T::Action,
        respond_to: Response<T, T::ActionResult>,
    },
}
