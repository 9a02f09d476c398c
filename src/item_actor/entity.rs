//! Entity trait implementation for the Item domain type.
//!
//! The item actor's context is the category client: `on_create` refuses items whose category
//! does not exist. Inventory actions never leave the actor, so allocation is a single
//! sequential step.

use super::actions::{ItemAction, ItemActionResult, Restock};
use super::error::CatalogError;
use crate::model::{Category, Item, ItemCreate, ItemId, ItemKind, ItemUpdate};
use actor_framework::{ActorEntity, ResourceClient};
use async_trait::async_trait;
use rust_decimal::Decimal;

#[async_trait]
impl ActorEntity for Item {
    type Id = ItemId;
    type Create = ItemCreate;
    type Update = ItemUpdate;
    type Action = ItemAction;
    type ActionResult = ItemActionResult;
    type Context = ResourceClient<Category>;
    type Error = CatalogError;

    fn id(&self) -> ItemId {
        self.id.clone()
    }

    fn from_create_params(id: ItemId, params: ItemCreate) -> Result<Self, Self::Error> {
        params.validate()?;
        Ok(Self {
            id,
            category_id: params.category_id,
            title: params.title.trim().to_string(),
            kind: params.kind,
            unit_price: params.unit_price,
            quantity: params.quantity,
            codes: params.codes,
            active: true,
        })
    }

    fn validate(&self) -> Result<(), Self::Error> {
        self.check_invariants()
    }

    async fn on_create(&mut self, categories: &Self::Context) -> Result<(), Self::Error> {
        match categories.get(self.category_id.clone()).await {
            Ok(Some(_)) => Ok(()),
            Ok(None) => Err(CatalogError::NotFound(self.category_id.to_string())),
            Err(e) => Err(CatalogError::ActorCommunicationError(e.to_string())),
        }
    }

    /// # Fields Updated
    /// - `title`: must not be blank
    /// - `unit_price`: must not be negative; existing orders keep their snapshot
    /// - `active`: inactive items are hidden from browsing and ordering
    async fn on_update(
        &mut self,
        update: ItemUpdate,
        _ctx: &Self::Context,
    ) -> Result<(), Self::Error> {
        if let Some(title) = update.title {
            let title = title.trim();
            if title.is_empty() {
                return Err(CatalogError::Validation("title must not be blank".into()));
            }
            self.title = title.to_string();
        }
        if let Some(price) = update.unit_price {
            if price < Decimal::ZERO {
                return Err(CatalogError::Validation(format!(
                    "price must not be negative, got {price}"
                )));
            }
            self.unit_price = price;
        }
        if let Some(active) = update.active {
            self.active = active;
        }
        Ok(())
    }

    async fn handle_action(
        &mut self,
        action: ItemAction,
        _ctx: &Self::Context,
    ) -> Result<ItemActionResult, Self::Error> {
        match action {
            ItemAction::Allocate(n) => self.allocate(n).map(ItemActionResult::Allocate),
            ItemAction::Release(codes) => self.release(codes).map(ItemActionResult::Release),
            ItemAction::Restock(stock) => self.restock(stock).map(ItemActionResult::Restock),
        }
    }
}

impl Item {
    fn allocate(&mut self, n: u32) -> Result<Vec<String>, CatalogError> {
        if n == 0 {
            return Err(CatalogError::Validation(
                "allocation must be at least one unit".into(),
            ));
        }
        match self.kind {
            ItemKind::Recharge => Ok(Vec::new()),
            ItemKind::Voucher => {
                let available = self.quantity.min(pool_len(self)?);
                if available < n {
                    return Err(CatalogError::OutOfStock {
                        requested: n,
                        available,
                    });
                }
                let codes = self.codes.take_front(n as usize);
                self.quantity -= n;
                Ok(codes)
            }
        }
    }

    fn release(&mut self, codes: Vec<String>) -> Result<u32, CatalogError> {
        if codes.is_empty() {
            return Ok(self.quantity);
        }
        if self.kind != ItemKind::Voucher {
            return Err(CatalogError::Validation(
                "only voucher items hold codes".into(),
            ));
        }
        self.codes.restore_front(codes)?;
        self.quantity = pool_len(self)?;
        Ok(self.quantity)
    }

    fn restock(&mut self, stock: Restock) -> Result<u32, CatalogError> {
        match (self.kind, stock) {
            (ItemKind::Voucher, Restock::Codes(codes)) => {
                if codes.is_empty() {
                    return Err(CatalogError::Validation("no codes to add".into()));
                }
                self.codes.extend(codes)?;
                self.quantity = pool_len(self)?;
            }
            (ItemKind::Recharge, Restock::Units(units)) => {
                if units == 0 {
                    return Err(CatalogError::Validation("no units to add".into()));
                }
                self.quantity = self.quantity.checked_add(units).ok_or_else(|| {
                    CatalogError::Validation(format!("quantity overflow adding {units}"))
                })?;
            }
            (kind, _) => {
                return Err(CatalogError::Validation(format!(
                    "{kind} items cannot be restocked that way"
                )));
            }
        }
        Ok(self.quantity)
    }
}

fn pool_len(item: &Item) -> Result<u32, CatalogError> {
    u32::try_from(item.codes.len())
        .map_err(|_| CatalogError::Validation("code pool too large".into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CategoryId, CodePool};
    use actor_framework::mock::create_mock_client;

    fn voucher(codes: &[&str]) -> Item {
        Item {
            id: ItemId(1),
            category_id: CategoryId(1),
            title: "Gift Card".into(),
            kind: ItemKind::Voucher,
            unit_price: Decimal::from(100),
            quantity: codes.len() as u32,
            codes: CodePool::from_codes(codes).unwrap(),
            active: true,
        }
    }

    fn recharge(units: u32) -> Item {
        Item {
            kind: ItemKind::Recharge,
            quantity: units,
            codes: CodePool::new(),
            ..voucher(&[])
        }
    }

    #[tokio::test]
    async fn allocate_takes_codes_in_order() {
        let (ctx, _rx) = create_mock_client::<Category>(1);
        let mut item = voucher(&["A", "B", "C"]);

        let result = item.handle_action(ItemAction::Allocate(2), &ctx).await;
        assert_eq!(result, Ok(ItemActionResult::Allocate(vec!["A".into(), "B".into()])));
        assert_eq!(item.quantity, 1);
        assert!(item.stock_consistent());
    }

    #[tokio::test]
    async fn allocate_more_than_stock_is_out_of_stock() {
        let (ctx, _rx) = create_mock_client::<Category>(1);
        let mut item = voucher(&["A"]);

        let result = item.handle_action(ItemAction::Allocate(2), &ctx).await;
        assert_eq!(
            result,
            Err(CatalogError::OutOfStock {
                requested: 2,
                available: 1
            })
        );
        assert_eq!(item, voucher(&["A"]));
    }

    #[tokio::test]
    async fn allocate_zero_is_rejected() {
        let (ctx, _rx) = create_mock_client::<Category>(1);
        let mut item = voucher(&["A"]);
        assert!(matches!(
            item.handle_action(ItemAction::Allocate(0), &ctx).await,
            Err(CatalogError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn recharge_allocation_is_a_no_op() {
        let (ctx, _rx) = create_mock_client::<Category>(1);
        let mut item = recharge(5);

        let result = item.handle_action(ItemAction::Allocate(3), &ctx).await;
        assert_eq!(result, Ok(ItemActionResult::Allocate(vec![])));
        assert_eq!(item.quantity, 5);
    }

    #[tokio::test]
    async fn release_and_restock_keep_pool_and_quantity_in_step() {
        let (ctx, _rx) = create_mock_client::<Category>(1);
        let mut item = voucher(&["C"]);

        let released = item
            .handle_action(ItemAction::Release(vec!["A".into(), "B".into()]), &ctx)
            .await;
        assert_eq!(released, Ok(ItemActionResult::Release(3)));
        assert_eq!(item.codes.iter().collect::<Vec<_>>(), vec!["A", "B", "C"]);

        let restocked = item
            .handle_action(ItemAction::Restock(Restock::Codes(vec!["D".into()])), &ctx)
            .await;
        assert_eq!(restocked, Ok(ItemActionResult::Restock(4)));
        assert!(item.stock_consistent());

        let wrong = item
            .handle_action(ItemAction::Restock(Restock::Units(1)), &ctx)
            .await;
        assert!(matches!(wrong, Err(CatalogError::Validation(_))));
    }

    #[tokio::test]
    async fn recharge_restocks_units() {
        let (ctx, _rx) = create_mock_client::<Category>(1);
        let mut item = recharge(1);

        let result = item
            .handle_action(ItemAction::Restock(Restock::Units(4)), &ctx)
            .await;
        assert_eq!(result, Ok(ItemActionResult::Restock(5)));

        let codes = item
            .handle_action(ItemAction::Restock(Restock::Codes(vec!["X".into()])), &ctx)
            .await;
        assert!(codes.is_err());
    }

    #[tokio::test]
    async fn update_rejects_negative_price() {
        let (ctx, _rx) = create_mock_client::<Category>(1);
        let mut item = voucher(&["A"]);

        let update = ItemUpdate {
            unit_price: Some(Decimal::from(-5)),
            ..Default::default()
        };
        assert!(item.on_update(update, &ctx).await.is_err());

        let update = ItemUpdate {
            title: Some(" Gift Card XL ".into()),
            active: Some(false),
            ..Default::default()
        };
        item.on_update(update, &ctx).await.unwrap();
        assert_eq!(item.title, "Gift Card XL");
        assert!(!item.active);
    }
}
