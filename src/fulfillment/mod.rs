//! # Fulfillment Coordinator
//!
//! Orchestrates buyer and admin actions against the catalog and the order ledger and decides
//! what to tell the buyer.
//!
//! ## Structure
//!
//! - [`guard`] - per-order in-flight guard
//! - [`notify`] - [`Notifier`] seam for the chat transport, plus log and in-memory notifiers
//! - [`messages`] - buyer notices and admin acknowledgments
//!
//! ## One code, one order
//!
//! Two mechanisms combine when admins resolve orders concurrently:
//!
//! 1. `resolve` holds the order's [`OrderGuard`] while it reads the order, allocates stock and
//!    records the outcome, so a double-clicked confirm runs strictly after the first one and
//!    then finds a terminal order.
//! 2. Allocation is a single message to the item actor, so confirms for *different* orders of
//!    the same item are checked against the pool one at a time.
//!
//! Notifications are sent after the guard is released. A failed notification is logged and
//! reported in [`Resolved`]; the order keeps its new status.

pub mod guard;
pub mod messages;
pub mod notify;

pub use guard::{OrderGuard, OrderGuards};
pub use notify::{notify_with_retry, LogNotifier, MemoryNotifier, Notice, Notifier, NotifyOutcome};

use crate::clients::{CatalogClient, OrderLedger};
use crate::config::ShopConfig;
use crate::directory::Directory;
use crate::item_actor::CatalogError;
use crate::model::{Item, ItemId, ItemKind, Order, OrderFilter, OrderId, OrderStatus, UserId};
use crate::order_actor::OrderError;
use crate::payment::PaymentRequest;
use crate::quantity::{QuantityToken, Step};
use std::fmt::Display;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info, instrument, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminAction {
    Confirm,
    Reject,
    Done,
}

impl Display for AdminAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            AdminAction::Confirm => "confirm",
            AdminAction::Reject => "reject",
            AdminAction::Done => "done",
        })
    }
}

impl FromStr for AdminAction {
    type Err = OrderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "confirm" => Ok(AdminAction::Confirm),
            "reject" => Ok(AdminAction::Reject),
            "done" => Ok(AdminAction::Done),
            other => Err(OrderError::Validation(format!("unknown admin action: {other:?}"))),
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum FulfillmentError {
    #[error("User {0} is not authorized for this action")]
    Unauthorized(UserId),

    #[error("Out of stock: requested {requested}, available {available}")]
    OutOfStock { requested: u32, available: u32 },

    #[error(transparent)]
    Catalog(CatalogError),

    #[error(transparent)]
    Order(OrderError),
}

impl From<CatalogError> for FulfillmentError {
    fn from(e: CatalogError) -> Self {
        match e {
            CatalogError::OutOfStock {
                requested,
                available,
            } => FulfillmentError::OutOfStock {
                requested,
                available,
            },
            other => FulfillmentError::Catalog(other),
        }
    }
}

impl From<OrderError> for FulfillmentError {
    fn from(e: OrderError) -> Self {
        match e {
            OrderError::Catalog(e) => e.into(),
            other => FulfillmentError::Order(other),
        }
    }
}

/// What `resolve` did to the order.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// Voucher confirmed: codes withdrawn and recorded on the order.
    Delivered { order: Order, codes: Vec<String> },
    /// Recharge confirmed: marked paid, an admin still has to top it up.
    AwaitingManualRecharge { order: Order },
    Rejected { order: Order },
    /// Recharge marked done by an admin.
    Completed { order: Order },
    /// Nothing changed; the order was already resolved.
    AlreadyProcessed { order_id: OrderId, status: OrderStatus },
}

impl Resolution {
    pub fn order(&self) -> Option<&Order> {
        match self {
            Resolution::Delivered { order, .. }
            | Resolution::AwaitingManualRecharge { order }
            | Resolution::Rejected { order }
            | Resolution::Completed { order } => Some(order),
            Resolution::AlreadyProcessed { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Resolved {
    pub resolution: Resolution,
    /// `None` when nothing was sent (already processed).
    pub buyer_notice: Option<NotifyOutcome>,
    pub admin_ack: String,
}

/// Result of a keypad press.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub item: Item,
    pub quantity: u32,
    pub step: Step,
}

impl Selection {
    pub fn keypad(&self) -> [QuantityToken; 4] {
        QuantityToken::keypad(&self.item.id, self.quantity)
    }
}

/// A freshly placed order and what the buyer has to pay.
#[derive(Debug, Clone, PartialEq)]
pub struct Checkout {
    pub order: Order,
    pub payment: PaymentRequest,
    /// Payment page for the buyer; the attachment is the UPI link when a handle is set.
    pub page: Notice,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub order: Order,
    /// One outcome per admin that was told about the order.
    pub admins_notified: Vec<(UserId, NotifyOutcome)>,
}

#[derive(Debug, Clone)]
pub struct FulfillmentSettings {
    pub notify_attempts: u32,
    pub support_link: String,
    pub payee_name: String,
}

impl From<&ShopConfig> for FulfillmentSettings {
    fn from(config: &ShopConfig) -> Self {
        Self {
            notify_attempts: config.notify_attempts,
            support_link: config.support_link(),
            payee_name: config.payee_name.clone(),
        }
    }
}

#[derive(Clone)]
pub struct FulfillmentCoordinator {
    catalog: CatalogClient,
    ledger: OrderLedger,
    directory: Arc<Directory>,
    notifier: Arc<dyn Notifier>,
    guards: OrderGuards,
    settings: Arc<FulfillmentSettings>,
}

impl FulfillmentCoordinator {
    pub fn new(
        catalog: CatalogClient,
        ledger: OrderLedger,
        directory: Arc<Directory>,
        notifier: Arc<dyn Notifier>,
        settings: FulfillmentSettings,
    ) -> Self {
        Self {
            catalog,
            ledger,
            directory,
            notifier,
            guards: OrderGuards::new(),
            settings: Arc::new(settings),
        }
    }

    pub fn directory(&self) -> &Directory {
        &self.directory
    }

    /// Orders currently being resolved.
    pub fn in_flight(&self) -> usize {
        self.guards.len()
    }

    /// Applies a keypad token against the item's current stock.
    #[instrument(skip(self))]
    pub async fn select_quantity(&self, token: &str) -> Result<Selection, FulfillmentError> {
        let token: QuantityToken = token.parse()?;
        let item = self.active_item(token.item_id.clone()).await?;
        let quantity = token.resolve(item.quantity)?;
        debug!(quantity, "Quantity selected");
        Ok(Selection {
            item,
            quantity,
            step: token.step,
        })
    }

    /// Creates a pending order and the payment request for it.
    #[instrument(skip(self))]
    pub async fn place_order(
        &self,
        user: UserId,
        item_id: ItemId,
        quantity: u32,
    ) -> Result<Checkout, FulfillmentError> {
        let order = self.ledger.create(user, item_id.clone(), quantity).await?;
        let payment = PaymentRequest::new(
            self.directory.payment_handle().unwrap_or_default(),
            order.total,
        );
        let title = self.item_title(&item_id).await;
        let page = messages::payment_details(&title, &order, &payment, &self.settings.payee_name);
        info!(order = %order.id, total = %order.total, "Order placed");
        Ok(Checkout {
            order,
            payment,
            page,
        })
    }

    /// Records the buyer's payment reference and tells every admin to verify it.
    #[instrument(skip(self))]
    pub async fn submit_payment(
        &self,
        order_id: OrderId,
        user: UserId,
        reference: &str,
    ) -> Result<Submission, FulfillmentError> {
        let order = self.ledger.get_order(order_id.clone()).await?;
        if order.user_id != user {
            return Err(FulfillmentError::Unauthorized(user));
        }
        let order = self.ledger.record_txn(order_id, reference).await?;

        let title = self.item_title(&order.item_id).await;
        let notice = messages::awaiting_verification(&order, &title);
        let mut admins_notified = Vec::new();
        for admin in self.directory.admins() {
            let outcome = notify_with_retry(
                self.notifier.as_ref(),
                admin,
                &notice,
                self.settings.notify_attempts,
            )
            .await;
            admins_notified.push((admin, outcome));
        }
        info!(order = %order.id, admins = admins_notified.len(), "Payment submitted");
        Ok(Submission {
            order,
            admins_notified,
        })
    }

    /// Applies an admin decision to an order, then notifies the buyer.
    #[instrument(skip(self), fields(order = %order_id))]
    pub async fn resolve(
        &self,
        order_id: OrderId,
        admin: UserId,
        action: AdminAction,
    ) -> Result<Resolved, FulfillmentError> {
        self.authorize(admin)?;

        let resolution = {
            let _guard = self.guards.acquire(order_id.clone()).await;
            self.apply(order_id, action).await?
        };
        info!(?resolution, "Order resolved");

        Ok(self.announce(resolution).await)
    }

    /// Admin order view.
    #[instrument(skip(self))]
    pub async fn orders(
        &self,
        admin: UserId,
        filter: OrderFilter,
    ) -> Result<Vec<Order>, FulfillmentError> {
        self.authorize(admin)?;
        Ok(self.ledger.list(filter).await?)
    }

    fn authorize(&self, user: UserId) -> Result<(), FulfillmentError> {
        if self.directory.is_admin(user) {
            Ok(())
        } else {
            warn!(%user, "Rejected admin request from non-admin");
            Err(FulfillmentError::Unauthorized(user))
        }
    }

    async fn apply(
        &self,
        order_id: OrderId,
        action: AdminAction,
    ) -> Result<Resolution, FulfillmentError> {
        let order = self.ledger.get_order(order_id).await?;
        match action {
            AdminAction::Confirm => self.confirm(order).await,
            AdminAction::Reject => self.reject(order).await,
            AdminAction::Done => self.complete(order).await,
        }
    }

    async fn confirm(&self, order: Order) -> Result<Resolution, FulfillmentError> {
        let target = match order.item_kind {
            ItemKind::Voucher => OrderStatus::Delivered,
            ItemKind::Recharge => OrderStatus::Paid,
        };
        match order.status {
            OrderStatus::AwaitingVerification => {}
            OrderStatus::Pending => {
                return Err(OrderError::InvalidState {
                    from: order.status,
                    to: target,
                }
                .into())
            }
            status => return Ok(already(order.id, status)),
        }

        // Recharge allocation withdraws nothing but still fails for a vanished item.
        let codes = self
            .catalog
            .allocate(order.item_id.clone(), order.quantity)
            .await?;

        match order.item_kind {
            ItemKind::Voucher => {
                let attached = self
                    .ledger
                    .attach_codes(order.id.clone(), codes.clone())
                    .await;
                if let Err(e) = &attached {
                    warn!(error = %e, "Could not record codes, returning them to the pool");
                    if let Err(release) = self.catalog.release(order.item_id.clone(), codes.clone()).await {
                        error!(error = %release, ?codes, "Failed to return codes to the pool");
                    }
                }
                settle(order.id, attached, |order| Resolution::Delivered { order, codes })
            }
            ItemKind::Recharge => {
                let paid = self.ledger.transition(order.id.clone(), target).await;
                settle(order.id, paid, |order| Resolution::AwaitingManualRecharge { order })
            }
        }
    }

    async fn reject(&self, order: Order) -> Result<Resolution, FulfillmentError> {
        if order.status.is_terminal() {
            return Ok(already(order.id, order.status));
        }
        let rejected = self
            .ledger
            .transition(order.id.clone(), OrderStatus::Rejected)
            .await;
        settle(order.id, rejected, |order| Resolution::Rejected { order })
    }

    async fn complete(&self, order: Order) -> Result<Resolution, FulfillmentError> {
        match order.status {
            OrderStatus::Paid => {
                let done = self
                    .ledger
                    .transition(order.id.clone(), OrderStatus::Delivered)
                    .await;
                settle(order.id, done, |order| Resolution::Completed { order })
            }
            OrderStatus::Delivered | OrderStatus::Rejected => Ok(already(order.id, order.status)),
            from => Err(OrderError::InvalidState {
                from,
                to: OrderStatus::Delivered,
            }
            .into()),
        }
    }

    async fn announce(&self, resolution: Resolution) -> Resolved {
        let (buyer, notice, ack) = match &resolution {
            Resolution::Delivered { order, codes } => {
                let title = self.item_title(&order.item_id).await;
                (
                    order.user_id,
                    messages::codes_delivered(order, &title, codes),
                    messages::ack_delivered(),
                )
            }
            Resolution::AwaitingManualRecharge { order } => (
                order.user_id,
                messages::recharge_paid(order),
                messages::ack_paid(),
            ),
            Resolution::Rejected { order } => (
                order.user_id,
                messages::rejected(order, &self.settings.support_link),
                messages::ack_rejected(),
            ),
            Resolution::Completed { order } => (
                order.user_id,
                messages::completed(order, &self.settings.payee_name),
                messages::ack_completed(),
            ),
            Resolution::AlreadyProcessed { order_id, status } => {
                let admin_ack = messages::ack_already(order_id.0, *status);
                return Resolved {
                    resolution,
                    buyer_notice: None,
                    admin_ack,
                };
            }
        };

        let outcome = notify_with_retry(
            self.notifier.as_ref(),
            buyer,
            &notice,
            self.settings.notify_attempts,
        )
        .await;
        let admin_ack = match &outcome {
            NotifyOutcome::Delivered => ack,
            NotifyOutcome::Failed(reason) => messages::ack_notify_failed(buyer, reason),
        };
        Resolved {
            resolution,
            buyer_notice: Some(outcome),
            admin_ack,
        }
    }

    async fn active_item(&self, item_id: ItemId) -> Result<Item, FulfillmentError> {
        let item = self.catalog.get_item(item_id.clone()).await?;
        if !item.active {
            return Err(CatalogError::NotFound(item_id.to_string()).into());
        }
        Ok(item)
    }

    /// Falls back to the item id when the catalog cannot be reached.
    async fn item_title(&self, item_id: &ItemId) -> String {
        match self.catalog.get_item(item_id.clone()).await {
            Ok(item) => item.title,
            Err(e) => {
                debug!(error = %e, "Item title unavailable");
                item_id.to_string()
            }
        }
    }
}

fn already(order_id: OrderId, status: OrderStatus) -> Resolution {
    Resolution::AlreadyProcessed { order_id, status }
}

/// A ledger write that lost the race to another transition is a no-op, not a failure.
fn settle(
    order_id: OrderId,
    result: Result<Order, OrderError>,
    applied: impl FnOnce(Order) -> Resolution,
) -> Result<Resolution, FulfillmentError> {
    match result {
        Ok(order) => Ok(applied(order)),
        Err(OrderError::AlreadyProcessed { status }) => Ok(already(order_id, status)),
        Err(e) => Err(e.into()),
    }
}
