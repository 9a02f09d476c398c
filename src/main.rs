//! Walks one voucher order and one recharge order through the shop, logging every step.
//!
//! Reads `ShopConfig` from the environment (`OWNER_ID` and friends, or a `.env` file). Without
//! an `OWNER_ID` the demo runs in memory with owner `1`.

use anyhow::Context;
use rust_decimal::Decimal;
use std::sync::Arc;
use storefront::config::{ConfigError, ShopConfig};
use storefront::fulfillment::{AdminAction, LogNotifier, Resolution};
use storefront::lifecycle::{setup_tracing, ShopSystem};
use storefront::model::{NewItem, UserId};
use tracing::{info, warn, Instrument};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    setup_tracing();

    let config = match ShopConfig::from_env() {
        Ok(config) => config,
        Err(ConfigError::Missing(key)) => {
            warn!(key, "Not configured, running in memory");
            ShopConfig::in_memory(UserId(1))
        }
        Err(e) => return Err(e).context("invalid shop configuration"),
    };
    let admin = config.owner_id;
    let buyer = UserId(1001);

    let system = ShopSystem::new(&config, Arc::new(LogNotifier))?;
    system
        .directory
        .set_payment_handle(admin, "codespro@upi")
        .context("setting the payment handle")?;

    let (voucher, recharge) = async {
        let games = system.catalog.add_category("Games").await?;
        let voucher = system
            .catalog
            .add_item(NewItem {
                category_id: games.clone(),
                title: "Gift Card".into(),
                kind: "voucher".into(),
                unit_price: Decimal::from(100),
                quantity: 2,
                codes: vec!["GIFT-A".into(), "GIFT-B".into()],
            })
            .await?;
        let recharge = system
            .catalog
            .add_item(NewItem {
                category_id: games,
                title: "Game Credits".into(),
                kind: "recharge".into(),
                unit_price: Decimal::new(4999, 2),
                quantity: 50,
                codes: Vec::new(),
            })
            .await?;
        anyhow::Ok((voucher, recharge))
    }
    .instrument(tracing::info_span!("catalog_setup"))
    .await?;

    let coordinator = &system.coordinator;

    async {
        let selection = coordinator
            .select_quantity(&format!("inc_{}_1", voucher.0))
            .await?;
        let checkout = coordinator
            .place_order(buyer, voucher.clone(), selection.quantity)
            .await?;
        info!(total = %checkout.payment.amount, link = ?checkout.page.attachment, "Checkout ready");

        coordinator
            .submit_payment(checkout.order.id.clone(), buyer, "TXN1")
            .await?;
        let resolved = coordinator
            .resolve(checkout.order.id.clone(), admin, AdminAction::Confirm)
            .await?;
        if let Resolution::Delivered { codes, .. } = &resolved.resolution {
            info!(?codes, ack = %resolved.admin_ack, "Voucher delivered");
        }

        let again = coordinator
            .resolve(checkout.order.id, admin, AdminAction::Confirm)
            .await?;
        info!(ack = %again.admin_ack, "Second confirm");
        anyhow::Ok(())
    }
    .instrument(tracing::info_span!("voucher_order"))
    .await?;

    async {
        let checkout = coordinator.place_order(buyer, recharge, 1).await?;
        let order_id = checkout.order.id;
        coordinator
            .submit_payment(order_id.clone(), buyer, "TXN2")
            .await?;
        for action in [AdminAction::Confirm, AdminAction::Done] {
            let resolved = coordinator.resolve(order_id.clone(), admin, action).await?;
            info!(%action, ack = %resolved.admin_ack, "Recharge resolved");
        }
        anyhow::Ok(())
    }
    .instrument(tracing::info_span!("recharge_order"))
    .await?;

    system.shutdown().await?;
    info!("Demo completed");
    Ok(())
}
