//! # Generic Actor Server
//!
//! `ResourceActor` owns the store for one entity type and processes requests one at a time.
//! Because a request is handled to completion before the next is read from the mailbox, every
//! request is a serializable unit of work: a check-then-modify inside a hook cannot interleave
//! with another caller's request against the same store.

use crate::client::ResourceClient;
use crate::entity::ActorEntity;
use crate::error::FrameworkError;
use crate::message::ResourceRequest;
use crate::snapshot::{Persistence, SnapshotError};
use std::collections::HashMap;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// The generic actor that manages a collection of entities.
///
/// # Concurrency Model
/// The actor is the only owner of `store`; clients talk to it over a bounded channel. Many
/// actors run in parallel, each one sequentially, so the store needs no `Mutex`.
///
/// # Draft / Commit
/// `Update` and `Action` run the entity hook on a clone of the stored entity. The clone
/// replaces the stored value (and is persisted) only when the hook succeeds and the unique key
/// is still free. A failed hook or a failed snapshot write leaves the store exactly as it was.
///
/// # Usage Pattern
///
/// 1. **Create**: `ResourceActor::new()` returns the actor (server) and a client.
/// 2. **Persist** (optional): `.with_persistence(backend)` loads the stored image.
/// 3. **Run**: spawn `actor.run(context)`, injecting the dependencies the hooks need.
///
/// ```rust
/// use actor_framework::{ActorEntity, ResourceActor};
/// use async_trait::async_trait;
///
/// #[derive(Clone, Debug)] struct Counter { id: u32, hits: u32 }
/// #[derive(Debug)] struct CounterCreate;
/// #[derive(Debug)] struct CounterUpdate;
/// #[derive(Debug)] enum CounterAction { Hit }
/// #[derive(Debug, thiserror::Error)] #[error("counter error")] struct CounterError;
///
/// #[async_trait]
/// impl ActorEntity for Counter {
///     type Id = u32;
///     type Create = CounterCreate;
///     type Update = CounterUpdate;
///     type Action = CounterAction;
///     type ActionResult = u32;
///     type Context = ();
///     type Error = CounterError;
///
///     fn id(&self) -> u32 { self.id }
///     fn from_create_params(id: u32, _: CounterCreate) -> Result<Self, Self::Error> {
///         Ok(Self { id, hits: 0 })
///     }
///     async fn on_update(&mut self, _: CounterUpdate, _: &()) -> Result<(), Self::Error> { Ok(()) }
///     async fn handle_action(&mut self, _: CounterAction, _: &()) -> Result<u32, Self::Error> {
///         self.hits += 1;
///         Ok(self.hits)
///     }
/// }
///
/// #[tokio::main]
/// async fn main() {
///     let (actor, client) = ResourceActor::<Counter>::new(10);
///     tokio::spawn(actor.run(()));
///
///     let id = client.create(CounterCreate).await.unwrap();
///     assert_eq!(client.perform_action(id, CounterAction::Hit).await.unwrap(), 1);
/// }
/// ```
pub struct ResourceActor<T: ActorEntity> {
    receiver: mpsc::Receiver<ResourceRequest<T>>,
    store: HashMap<T::Id, T>,
    next_id: u32,
    persistence: Option<Box<dyn Persistence<T>>>,
}

impl<T: ActorEntity> ResourceActor<T> {
    /// Creates a new `ResourceActor` and its associated `ResourceClient`.
    ///
    /// `buffer_size` is the capacity of the mailbox; callers wait when it is full.
    pub fn new(buffer_size: usize) -> (Self, ResourceClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            store: HashMap::new(),
            next_id: 1,
            persistence: None,
        };
        (actor, ResourceClient::new(sender))
    }

    /// Attaches a storage backend and loads whatever it holds.
    pub fn with_persistence(
        mut self,
        mut backend: Box<dyn Persistence<T>>,
    ) -> Result<Self, SnapshotError> {
        if let Some(image) = backend.load()? {
            for entity in &image.entities {
                entity.validate().map_err(|e| SnapshotError::Invalid {
                    entity: entity.id().to_string(),
                    reason: e.to_string(),
                })?;
            }
            self.next_id = image.next_id.max(1);
            self.store = image
                .entities
                .into_iter()
                .map(|entity| (entity.id(), entity))
                .collect();
        }
        self.persistence = Some(backend);
        Ok(self)
    }

    /// Runs the actor's event loop until every client has been dropped.
    ///
    /// The `context` is handed to every entity hook.
    pub async fn run(mut self, context: T::Context) {
        // "Item" instead of "storefront::model::item::Item"
        let entity_type = std::any::type_name::<T>()
            .split("::")
            .last()
            .unwrap_or("Unknown");
        info!(entity_type, size = self.store.len(), "Actor started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                ResourceRequest::Create { params, respond_to } => {
                    debug!(entity_type, ?params, "Create");
                    let id = T::Id::from(self.next_id);
                    self.next_id += 1;

                    let result = self.create(id.clone(), params, &context).await;
                    match &result {
                        Ok(_) => info!(entity_type, %id, size = self.store.len(), "Created"),
                        Err(e) => warn!(entity_type, error = %e, "Create failed"),
                    }
                    let _ = respond_to.send(result);
                }
                ResourceRequest::Get { id, respond_to } => {
                    let item = self.store.get(&id).cloned();
                    debug!(entity_type, %id, found = item.is_some(), "Get");
                    let _ = respond_to.send(Ok(item));
                }
                ResourceRequest::List { respond_to } => {
                    debug!(entity_type, size = self.store.len(), "List");
                    let _ = respond_to.send(Ok(self.store.values().cloned().collect()));
                }
                ResourceRequest::Update {
                    id,
                    update,
                    respond_to,
                } => {
                    debug!(entity_type, %id, ?update, "Update");
                    let result = match self.draft(&id) {
                        Ok(mut draft) => match draft.on_update(update, &context).await {
                            Ok(()) => self.commit(id.clone(), draft.clone()).map(|()| draft),
                            Err(e) => Err(FrameworkError::Entity(e)),
                        },
                        Err(e) => Err(e),
                    };
                    match &result {
                        Ok(_) => info!(entity_type, %id, "Updated"),
                        Err(e) => warn!(entity_type, %id, error = %e, "Update failed"),
                    }
                    let _ = respond_to.send(result);
                }
                ResourceRequest::Action {
                    id,
                    action,
                    respond_to,
                } => {
                    debug!(entity_type, %id, ?action, "Action");
                    let result = match self.draft(&id) {
                        Ok(mut draft) => match draft.handle_action(action, &context).await {
                            Ok(outcome) => self.commit(id.clone(), draft).map(|()| outcome),
                            Err(e) => Err(FrameworkError::Entity(e)),
                        },
                        Err(e) => Err(e),
                    };
                    match &result {
                        Ok(_) => info!(entity_type, %id, "Action ok"),
                        Err(e) => warn!(entity_type, %id, error = %e, "Action failed"),
                    }
                    let _ = respond_to.send(result);
                }
            }
        }

        info!(entity_type, size = self.store.len(), "Shutdown");
    }

    async fn create(
        &mut self,
        id: T::Id,
        params: T::Create,
        context: &T::Context,
    ) -> Result<T::Id, FrameworkError<T::Error>> {
        let mut item = T::from_create_params(id.clone(), params).map_err(FrameworkError::Entity)?;
        item.on_create(context).await.map_err(FrameworkError::Entity)?;
        self.commit(id.clone(), item)?;
        Ok(id)
    }

    fn draft(&self, id: &T::Id) -> Result<T, FrameworkError<T::Error>> {
        self.store
            .get(id)
            .cloned()
            .ok_or_else(|| FrameworkError::NotFound(id.to_string()))
    }

    /// Stores `entity` under `id` and persists the store, restoring the previous value if the
    /// key is taken or the write fails.
    fn commit(&mut self, id: T::Id, entity: T) -> Result<(), FrameworkError<T::Error>> {
        if let Some(key) = entity.unique_key() {
            let taken = self
                .store
                .iter()
                .any(|(other, e)| *other != id && e.unique_key().as_deref() == Some(key.as_str()));
            if taken {
                return Err(FrameworkError::Conflict(key));
            }
        }

        let previous = self.store.insert(id.clone(), entity);
        if let Some(backend) = self.persistence.as_mut() {
            if let Err(e) = backend.save(self.next_id, &self.store) {
                match previous {
                    Some(previous) => self.store.insert(id, previous),
                    None => self.store.remove(&id),
                };
                return Err(e.into());
            }
        }
        Ok(())
    }
}
