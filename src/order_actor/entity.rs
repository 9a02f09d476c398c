//! Entity trait implementation for the Order domain type.
//!
//! The order actor's context is the item client. `on_create` reads the item once and
//! snapshots its kind and price, so later catalog edits never change an existing order.

use super::actions::OrderAction;
use super::error::OrderError;
use crate::item_actor::CatalogError;
use crate::model::{Item, ItemKind, Order, OrderCreate, OrderId, OrderStatus, OrderUpdate};
use actor_framework::{ActorEntity, ResourceClient};
use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;

#[async_trait]
impl ActorEntity for Order {
    type Id = OrderId;
    type Create = OrderCreate;
    type Update = OrderUpdate;
    type Action = OrderAction;
    type ActionResult = Order;
    type Context = ResourceClient<Item>;
    type Error = OrderError;

    fn id(&self) -> OrderId {
        self.id.clone()
    }

    fn from_create_params(id: OrderId, params: OrderCreate) -> Result<Self, Self::Error> {
        Ok(Self::new(id, params.user_id, params.item_id, params.quantity))
    }

    /// Validates the quantity against current stock and snapshots price and kind.
    async fn on_create(&mut self, items: &Self::Context) -> Result<(), Self::Error> {
        let item = match items.get(self.item_id.clone()).await {
            Ok(Some(item)) if item.active => item,
            Ok(_) => return Err(CatalogError::NotFound(self.item_id.to_string()).into()),
            Err(e) => return Err(CatalogError::ActorCommunicationError(e.to_string()).into()),
        };

        if self.quantity < 1 || self.quantity > item.quantity {
            return Err(OrderError::InvalidQuantity {
                requested: self.quantity,
                available: item.quantity,
            });
        }

        self.item_kind = item.kind;
        self.unit_price = item.unit_price;
        self.total = item.unit_price * Decimal::from(self.quantity);
        Ok(())
    }

    async fn on_update(&mut self, update: OrderUpdate, _ctx: &Self::Context) -> Result<(), Self::Error> {
        match update {}
    }

    async fn handle_action(
        &mut self,
        action: OrderAction,
        _ctx: &Self::Context,
    ) -> Result<Order, Self::Error> {
        match action {
            OrderAction::RecordTxn(reference) => {
                let reference = reference.trim();
                if reference.is_empty() {
                    return Err(OrderError::Validation(
                        "payment reference must not be blank".into(),
                    ));
                }
                if self.status != OrderStatus::Pending {
                    return Err(OrderError::InvalidState {
                        from: self.status,
                        to: OrderStatus::AwaitingVerification,
                    });
                }
                self.txn_reference = Some(reference.to_string());
                self.move_to(OrderStatus::AwaitingVerification);
            }
            OrderAction::Transition(target) => {
                self.check_edge(target)?;
                match target {
                    OrderStatus::AwaitingVerification => {
                        return Err(OrderError::Validation(
                            "a payment reference is required".into(),
                        ));
                    }
                    OrderStatus::Delivered if self.item_kind == ItemKind::Voucher => {
                        return Err(OrderError::Validation(
                            "voucher delivery must carry its codes".into(),
                        ));
                    }
                    _ => {}
                }
                self.move_to(target);
            }
            OrderAction::Deliver(codes) => {
                self.check_edge(OrderStatus::Delivered)?;
                let expected = match self.item_kind {
                    ItemKind::Voucher => self.quantity as usize,
                    ItemKind::Recharge => 0,
                };
                if codes.len() != expected {
                    return Err(OrderError::Validation(format!(
                        "expected {expected} codes, got {}",
                        codes.len()
                    )));
                }
                self.delivered_codes = codes;
                self.move_to(OrderStatus::Delivered);
            }
        }
        Ok(self.clone())
    }
}

impl Order {
    /// Terminal or already there is `AlreadyProcessed`; anything off the table is `InvalidState`.
    fn check_edge(&self, target: OrderStatus) -> Result<(), OrderError> {
        if self.status.is_terminal() || self.status == target {
            return Err(OrderError::AlreadyProcessed {
                status: self.status,
            });
        }
        if !self.status.can_transition(target, self.item_kind) {
            return Err(OrderError::InvalidState {
                from: self.status,
                to: target,
            });
        }
        Ok(())
    }

    fn move_to(&mut self, status: OrderStatus) {
        self.status = status;
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ItemId, UserId};
    use actor_framework::mock::create_mock_client;

    fn order(kind: ItemKind, status: OrderStatus) -> Order {
        let mut order = Order::new(OrderId(1), UserId(10), ItemId(1), 2);
        order.item_kind = kind;
        order.status = status;
        order
    }

    #[tokio::test]
    async fn record_txn_moves_pending_to_awaiting() {
        let (ctx, _rx) = create_mock_client::<Item>(1);
        let mut o = order(ItemKind::Voucher, OrderStatus::Pending);

        let blank = o.handle_action(OrderAction::RecordTxn("  ".into()), &ctx).await;
        assert!(matches!(blank, Err(OrderError::Validation(_))));

        let updated = o
            .handle_action(OrderAction::RecordTxn(" TXN1 ".into()), &ctx)
            .await
            .unwrap();
        assert_eq!(updated.status, OrderStatus::AwaitingVerification);
        assert_eq!(updated.txn_reference.as_deref(), Some("TXN1"));

        let again = o.handle_action(OrderAction::RecordTxn("TXN2".into()), &ctx).await;
        assert!(matches!(again, Err(OrderError::InvalidState { .. })));
    }

    #[tokio::test]
    async fn deliver_requires_matching_codes() {
        let (ctx, _rx) = create_mock_client::<Item>(1);
        let mut o = order(ItemKind::Voucher, OrderStatus::AwaitingVerification);

        let short = o.handle_action(OrderAction::Deliver(vec!["A".into()]), &ctx).await;
        assert!(matches!(short, Err(OrderError::Validation(_))));

        let plain = o
            .handle_action(OrderAction::Transition(OrderStatus::Delivered), &ctx)
            .await;
        assert!(matches!(plain, Err(OrderError::Validation(_))));

        let done = o
            .handle_action(OrderAction::Deliver(vec!["A".into(), "B".into()]), &ctx)
            .await
            .unwrap();
        assert_eq!(done.status, OrderStatus::Delivered);
        assert_eq!(done.delivered_codes, vec!["A", "B"]);
    }

    #[tokio::test]
    async fn terminal_orders_report_already_processed() {
        let (ctx, _rx) = create_mock_client::<Item>(1);
        for status in [OrderStatus::Delivered, OrderStatus::Rejected] {
            let mut o = order(ItemKind::Voucher, status);
            let result = o
                .handle_action(OrderAction::Transition(OrderStatus::Rejected), &ctx)
                .await;
            assert_eq!(result, Err(OrderError::AlreadyProcessed { status }));
        }
    }

    #[tokio::test]
    async fn kind_mismatched_confirm_is_invalid() {
        let (ctx, _rx) = create_mock_client::<Item>(1);
        let mut o = order(ItemKind::Voucher, OrderStatus::AwaitingVerification);
        let result = o
            .handle_action(OrderAction::Transition(OrderStatus::Paid), &ctx)
            .await;
        assert_eq!(
            result,
            Err(OrderError::InvalidState {
                from: OrderStatus::AwaitingVerification,
                to: OrderStatus::Paid
            })
        );
    }

    #[tokio::test]
    async fn recharge_goes_through_paid() {
        let (ctx, _rx) = create_mock_client::<Item>(1);
        let mut o = order(ItemKind::Recharge, OrderStatus::AwaitingVerification);

        let early = o
            .handle_action(OrderAction::Transition(OrderStatus::Delivered), &ctx)
            .await;
        assert!(matches!(early, Err(OrderError::InvalidState { .. })));

        o.handle_action(OrderAction::Transition(OrderStatus::Paid), &ctx)
            .await
            .unwrap();
        let done = o
            .handle_action(OrderAction::Transition(OrderStatus::Delivered), &ctx)
            .await
            .unwrap();
        assert_eq!(done.status, OrderStatus::Delivered);
        assert!(done.delivered_codes.is_empty());
    }
}
