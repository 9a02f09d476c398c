//! # Catalog Client
//!
//! High-level API over the Category and Item actors: catalog administration, browsing and
//! the inventory allocator used by fulfillment.
use crate::item_actor::{CatalogError, ItemAction, ItemActionResult, Restock};
use crate::model::{
    Category, CategoryCreate, CategoryId, Item, ItemCreate, ItemId, ItemUpdate, NewItem,
};
use actor_framework::{ActorClient, FrameworkError, ResourceClient};
use async_trait::async_trait;
use tracing::{debug, instrument};

/// Client for the catalog. Cheap to clone.
#[derive(Clone)]
pub struct CatalogClient {
    categories: ResourceClient<Category>,
    items: ResourceClient<Item>,
}

fn map_framework_error(e: FrameworkError<CatalogError>) -> CatalogError {
    match e {
        FrameworkError::Entity(e) => e,
        FrameworkError::NotFound(id) => CatalogError::NotFound(id),
        FrameworkError::Conflict(name) => CatalogError::DuplicateCategory(name),
        other => CatalogError::ActorCommunicationError(other.to_string()),
    }
}

impl CatalogClient {
    pub fn new(categories: ResourceClient<Category>, items: ResourceClient<Item>) -> Self {
        Self { categories, items }
    }

    #[instrument(skip(self))]
    pub async fn add_category(&self, name: &str) -> Result<CategoryId, CatalogError> {
        debug!("Sending request");
        self.categories
            .create(CategoryCreate {
                name: name.to_string(),
            })
            .await
            .map_err(map_framework_error)
    }

    /// Every category, ordered by name.
    #[instrument(skip(self))]
    pub async fn list_categories(&self) -> Result<Vec<Category>, CatalogError> {
        debug!("Sending request");
        let mut categories = self
            .categories
            .list()
            .await
            .map_err(map_framework_error)?;
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    #[instrument(skip(self))]
    pub async fn get_category(&self, id: CategoryId) -> Result<Category, CatalogError> {
        debug!("Sending request");
        self.categories
            .get(id.clone())
            .await
            .map_err(map_framework_error)?
            .ok_or_else(|| CatalogError::NotFound(id.to_string()))
    }

    /// Validates raw admin input and stores the item.
    #[instrument(skip(self, item), fields(title = %item.title))]
    pub async fn add_item(&self, item: NewItem) -> Result<ItemId, CatalogError> {
        debug!(?item, "add_item called");
        let params = ItemCreate::try_from(item)?;
        self.items.create(params).await.map_err(map_framework_error)
    }

    /// Active items of one category, ordered by title.
    #[instrument(skip(self))]
    pub async fn list_active_items(&self, category_id: CategoryId) -> Result<Vec<Item>, CatalogError> {
        self.get_category(category_id.clone()).await?;
        let mut items: Vec<Item> = self
            .list()
            .await?
            .into_iter()
            .filter(|item| item.active && item.category_id == category_id)
            .collect();
        items.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(items)
    }

    #[instrument(skip(self))]
    pub async fn get_item(&self, id: ItemId) -> Result<Item, CatalogError> {
        self.get(id.clone())
            .await?
            .ok_or_else(|| CatalogError::NotFound(id.to_string()))
    }

    #[instrument(skip(self))]
    pub async fn update_item(&self, id: ItemId, update: ItemUpdate) -> Result<Item, CatalogError> {
        debug!("Sending request");
        self.items
            .update(id, update)
            .await
            .map_err(map_framework_error)
    }

    /// Adds stock and returns the new quantity.
    #[instrument(skip(self))]
    pub async fn restock(&self, id: ItemId, stock: Restock) -> Result<u32, CatalogError> {
        match self.action(id, ItemAction::Restock(stock)).await? {
            ItemActionResult::Restock(quantity) => Ok(quantity),
            other => Err(unexpected(other)),
        }
    }

    /// Withdraws `n` units atomically. Voucher items return their first `n` codes.
    #[instrument(skip(self))]
    pub async fn allocate(&self, id: ItemId, n: u32) -> Result<Vec<String>, CatalogError> {
        match self.action(id, ItemAction::Allocate(n)).await? {
            ItemActionResult::Allocate(codes) => Ok(codes),
            other => Err(unexpected(other)),
        }
    }

    /// Returns codes to the front of the pool and reports the new quantity.
    #[instrument(skip(self, codes), fields(count = codes.len()))]
    pub async fn release(&self, id: ItemId, codes: Vec<String>) -> Result<u32, CatalogError> {
        match self.action(id, ItemAction::Release(codes)).await? {
            ItemActionResult::Release(quantity) => Ok(quantity),
            other => Err(unexpected(other)),
        }
    }

    async fn action(&self, id: ItemId, action: ItemAction) -> Result<ItemActionResult, CatalogError> {
        debug!("Sending request");
        self.items
            .perform_action(id, action)
            .await
            .map_err(map_framework_error)
    }
}

fn unexpected(result: ItemActionResult) -> CatalogError {
    CatalogError::ActorCommunicationError(format!("unexpected action result: {result:?}"))
}

#[async_trait]
impl ActorClient<Item> for CatalogClient {
    type Error = CatalogError;

    fn inner(&self) -> &ResourceClient<Item> {
        &self.items
    }

    fn map_error(e: FrameworkError<CatalogError>) -> Self::Error {
        map_framework_error(e)
    }
}
