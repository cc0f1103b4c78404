//! Feature tier: cart add/remove flows sharing one authenticated session.

use storefront_common::testdata::{products, users, Product};

use crate::error::{E2eError, E2eResult};
use crate::scenario::{step, Cleanup, Ctx, Group, Scenario, SessionMode, Tier};

pub fn groups() -> Vec<Group> {
    vec![Group {
        name: "cart-add-remove",
        tier: Tier::Feature,
        critical: false,
        session_mode: SessionMode::SharedAuthenticated(users::cart_add_remove),
        cleanup: Cleanup::None,
        scenarios: vec![
            Scenario {
                name: "add a product and remove it by sku",
                run: |ctx| Box::pin(add_and_remove_by_sku(ctx)),
            },
            Scenario {
                name: "remove first item repeatedly until the cart empties",
                run: |ctx| Box::pin(remove_first_until_empty(ctx)),
            },
            Scenario {
                name: "clear cart via the confirm dialog",
                run: |ctx| Box::pin(clear_cart_via_dialog(ctx)),
            },
            Scenario {
                name: "cancelling the clear dialog keeps the items",
                run: |ctx| Box::pin(cancel_clear_keeps_items(ctx)),
            },
        ],
    }]
}

/// Menu navigation to a product's detail page, add to cart, optionally
/// follow the dialog through to the cart.
pub async fn add_product_via_menu(ctx: &Ctx, product: &Product, go_to_cart: bool) -> E2eResult<()> {
    ctx.pages.home.goto().await?;
    ctx.pages.home.navigate_to_brand(product.brand).await?;
    ctx.pages.home.navigate_to_collection(product.collection).await?;
    ctx.pages.product_list.select_product_by_code(product.code).await?;
    ctx.pages.product_detail.expect_loaded().await?;
    ctx.pages.product_detail.add_to_cart().await?;
    ctx.pages.product_detail.expect_added_to_cart_dialog().await?;
    if go_to_cart {
        ctx.pages.product_detail.go_to_cart().await?;
    }
    Ok(())
}

/// Empty-cart postcondition shared by every removal flow.
async fn verify_empty_cart(ctx: &Ctx) -> E2eResult<()> {
    ctx.pages.cart.expect_cart_empty().await?;
    ctx.pages.cart.expect_empty_cart_message().await?;
    let count = ctx.pages.cart.stabilized_item_count().await?;
    if count != 0 {
        return Err(E2eError::AssertionFailed(format!(
            "cart count settled at {count}, expected 0"
        )));
    }
    Ok(())
}

async fn add_and_remove_by_sku(ctx: Ctx) -> E2eResult<()> {
    step(
        "add product to cart",
        add_product_via_menu(&ctx, &products::BULOVA_ALL_CLOCKS, true),
    )
    .await?;

    let sku = step("read sku of the cart row", async {
        ctx.pages.cart.expect_cart_url().await?;
        ctx.pages.cart.expect_cart_not_empty().await?;
        let items = ctx.pages.cart.all_cart_items().await?;
        items
            .first()
            .map(|item| item.sku.clone())
            .ok_or_else(|| E2eError::AssertionFailed("cart rows vanished".into()))
    })
    .await?;

    step("remove by sku", ctx.pages.cart.remove_item_by_sku(&sku)).await?;
    step("verify empty cart", verify_empty_cart(&ctx)).await
}

async fn remove_first_until_empty(ctx: Ctx) -> E2eResult<()> {
    step(
        "add first product",
        add_product_via_menu(&ctx, &products::BULOVA_ALL_CLOCKS, false),
    )
    .await?;
    step(
        "add second product",
        add_product_via_menu(&ctx, &products::CITIZEN_TSUYOSA, true),
    )
    .await?;

    step("verify cart has multiple items", async {
        ctx.pages.cart.expect_cart_url().await?;
        let count = ctx.pages.cart.stabilized_item_count().await?;
        if count >= 2 {
            Ok(())
        } else {
            Err(E2eError::AssertionFailed(format!("expected at least 2 items, found {count}")))
        }
    })
    .await?;

    step("remove items one by one", ctx.pages.cart.remove_all_items()).await?;
    step("verify empty cart", verify_empty_cart(&ctx)).await
}

async fn clear_cart_via_dialog(ctx: Ctx) -> E2eResult<()> {
    step(
        "add product to cart",
        add_product_via_menu(&ctx, &products::BULOVA_ALL_CLOCKS, true),
    )
    .await?;
    step("verify cart has items", async {
        ctx.pages.cart.expect_cart_url().await?;
        ctx.pages.cart.expect_cart_not_empty().await
    })
    .await?;

    step("clear cart", async {
        ctx.pages.cart.click_clear_cart().await?;
        ctx.pages.cart.expect_clear_cart_dialog().await?;
        ctx.pages.cart.confirm_clear_cart().await
    })
    .await?;

    step("verify empty cart", verify_empty_cart(&ctx)).await
}

async fn cancel_clear_keeps_items(ctx: Ctx) -> E2eResult<()> {
    step(
        "add product to cart",
        add_product_via_menu(&ctx, &products::BULOVA_ALL_CLOCKS, true),
    )
    .await?;

    let before = step("count items", async {
        ctx.pages.cart.expect_cart_url().await?;
        let count = ctx.pages.cart.stabilized_item_count().await?;
        if count > 0 {
            Ok(count)
        } else {
            Err(E2eError::AssertionFailed("cart unexpectedly empty".into()))
        }
    })
    .await?;

    step("open and cancel the clear dialog", async {
        ctx.pages.cart.click_clear_cart().await?;
        ctx.pages.cart.expect_clear_cart_dialog().await?;
        ctx.pages.cart.cancel_clear_cart().await
    })
    .await?;

    step("items survived", async {
        let after = ctx.pages.cart.stabilized_item_count().await?;
        if after == before {
            Ok(())
        } else {
            Err(E2eError::AssertionFailed(format!(
                "cart changed from {before} to {after} items after cancel"
            )))
        }
    })
    .await?;

    // Leave the account's cart clean for the next run.
    step("cleanup", ctx.pages.cart.remove_all_items()).await
}
