use crate::clients::{CatalogClient, OrderLedger};
use crate::config::ShopConfig;
use crate::directory::{Directory, DirectoryError};
use crate::fulfillment::{FulfillmentCoordinator, FulfillmentSettings, Notifier};
use crate::{category_actor, item_actor, order_actor};
use actor_framework::{ActorEntity, JsonSnapshot, ResourceActor, SnapshotError};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{error, info};

#[derive(Debug, Error)]
pub enum ShopError {
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
    #[error(transparent)]
    Directory(#[from] DirectoryError),
    #[error("Actor task failed: {0}")]
    ActorTask(String),
}

/// The running shop: every actor spawned and wired, plus the clients to talk to them.
///
/// # Wiring
///
/// - **Category actor**: no dependencies (`Context = ()`)
/// - **Item actor**: checks categories on create (`Context = ResourceClient<Category>`)
/// - **Order actor**: reads items to snapshot price and stock (`Context = ResourceClient<Item>`)
/// - **Coordinator**: catalog client, order ledger, directory and notifier
///
/// With `data_dir` set, each actor loads `categories.json`, `items.json` or `orders.json` on
/// startup and rewrites it after every committed change; admins and settings live in
/// `directory.json`.
///
/// # Example
///
/// ```ignore
/// let system = ShopSystem::new(&ShopConfig::in_memory(UserId(1)), Arc::new(LogNotifier))?;
/// let games = system.catalog.add_category("Games").await?;
/// // ...
/// system.shutdown().await?;
/// ```
pub struct ShopSystem {
    pub catalog: CatalogClient,
    pub ledger: OrderLedger,
    pub coordinator: FulfillmentCoordinator,
    pub directory: Arc<Directory>,
    /// Order, item and category tasks, in shutdown order.
    handles: Vec<JoinHandle<()>>,
}

impl ShopSystem {
    /// Spawns the actors. Must be called inside a Tokio runtime.
    pub fn new(config: &ShopConfig, notifier: Arc<dyn Notifier>) -> Result<Self, ShopError> {
        let data_dir = config.data_dir.as_deref();
        if let Some(dir) = data_dir {
            std::fs::create_dir_all(dir).map_err(|source| SnapshotError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
        }

        // 1. Create actors, loading snapshots when persistent
        let (category_actor, category_client) = category_actor::new(config.actor_buffer);
        let (item_actor, item_client) = item_actor::new(config.actor_buffer);
        let (order_actor, order_client) = order_actor::new(config.actor_buffer);
        let category_actor = persisted(category_actor, data_dir, "categories.json")?;
        let item_actor = persisted(item_actor, data_dir, "items.json")?;
        let order_actor = persisted(order_actor, data_dir, "orders.json")?;

        let directory = Arc::new(match data_dir {
            Some(dir) => Directory::open(config.owner_id, dir.join("directory.json"))?,
            None => Directory::new(config.owner_id),
        });

        // 2. Start actors with injected context
        let category_handle = tokio::spawn(category_actor.run(()));
        let item_handle = tokio::spawn(item_actor.run(category_client.clone()));
        let order_handle = tokio::spawn(order_actor.run(item_client.clone()));

        // 3. Build the clients
        let catalog = CatalogClient::new(category_client, item_client);
        let ledger = OrderLedger::new(order_client);
        let coordinator = FulfillmentCoordinator::new(
            catalog.clone(),
            ledger.clone(),
            directory.clone(),
            notifier,
            FulfillmentSettings::from(config),
        );

        info!(
            owner = %config.owner_id,
            persistent = data_dir.is_some(),
            "Shop started"
        );
        Ok(Self {
            catalog,
            ledger,
            coordinator,
            directory,
            handles: vec![order_handle, item_handle, category_handle],
        })
    }

    /// Drops this system's clients and waits for every actor to stop.
    ///
    /// Actors stop once all clients are gone, so clones handed out elsewhere must be dropped
    /// first. The order actor holds the item client and the item actor holds the category
    /// client, so they wind down in that order.
    pub async fn shutdown(self) -> Result<(), ShopError> {
        info!("Shutting down shop...");

        drop(self.coordinator);
        drop(self.ledger);
        drop(self.catalog);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!("Actor task failed: {:?}", e);
                return Err(ShopError::ActorTask(e.to_string()));
            }
        }

        info!("Shop shutdown complete.");
        Ok(())
    }
}

fn persisted<T>(
    actor: ResourceActor<T>,
    data_dir: Option<&Path>,
    file: &str,
) -> Result<ResourceActor<T>, SnapshotError>
where
    T: ActorEntity + Serialize + DeserializeOwned,
{
    match data_dir {
        Some(dir) => actor.with_persistence(Box::new(JsonSnapshot::new(dir.join(file)))),
        None => Ok(actor),
    }
}
