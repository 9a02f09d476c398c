//! Entity trait implementation for the Category domain type.

use crate::item_actor::CatalogError;
use crate::model::{Category, CategoryCreate, CategoryId, CategoryUpdate};
use actor_framework::ActorEntity;
use async_trait::async_trait;

/// Categories have no custom actions.
#[derive(Debug, Clone)]
pub enum CategoryAction {}

#[async_trait]
impl ActorEntity for Category {
    type Id = CategoryId;
    type Create = CategoryCreate;
    type Update = CategoryUpdate;
    type Action = CategoryAction;
    type ActionResult = ();
    type Context = ();
    type Error = CatalogError;

    fn id(&self) -> CategoryId {
        self.id.clone()
    }

    fn from_create_params(id: CategoryId, params: CategoryCreate) -> Result<Self, Self::Error> {
        Ok(Self {
            id,
            name: checked_name(&params.name)?,
        })
    }

    /// The trimmed name; the actor rejects it if another category already uses it.
    fn unique_key(&self) -> Option<String> {
        Some(self.name.clone())
    }

    async fn on_update(&mut self, update: CategoryUpdate, _ctx: &()) -> Result<(), Self::Error> {
        self.name = checked_name(&update.name)?;
        Ok(())
    }

    async fn handle_action(&mut self, action: CategoryAction, _ctx: &()) -> Result<(), Self::Error> {
        match action {}
    }
}

fn checked_name(name: &str) -> Result<String, CatalogError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(CatalogError::Validation(
            "category name must not be blank".into(),
        ));
    }
    Ok(name.to_string())
}
