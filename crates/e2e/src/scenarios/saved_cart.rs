//! Feature tier: the full saved-cart workflow, from saving a named cart
//! through restore and cleanup, in one session.

use storefront_common::testdata::{products, users};

use crate::error::{E2eError, E2eResult};
use crate::scenario::{step, Cleanup, Ctx, Group, Scenario, SessionMode, Tier};

const SAVED_CART_NAME: &str = "TestCart";

pub fn groups() -> Vec<Group> {
    vec![Group {
        name: "saved-cart",
        tier: Tier::Feature,
        critical: false,
        session_mode: SessionMode::Isolated,
        cleanup: Cleanup::None,
        scenarios: vec![Scenario {
            name: "save a cart, restore it and clean up",
            run: |ctx| Box::pin(full_saved_cart_workflow(ctx)),
        }],
    }]
}

async fn full_saved_cart_workflow(ctx: Ctx) -> E2eResult<()> {
    let sku = products::CORSO.code;

    step("log in", ctx.pages.authenticate(&users::saved_cart())).await?;

    step("verify homepage", async {
        ctx.pages.home.goto().await?;
        ctx.pages.home.expect_homepage_loaded().await
    })
    .await?;

    step("search and open the product", async {
        ctx.pages.home.search_product_and_submit(sku).await?;
        ctx.pages.search_results.select_product_by_code(sku).await?;
        ctx.pages.product_detail.expect_loaded().await
    })
    .await?;

    step("add product to cart", async {
        ctx.pages.product_detail.add_to_cart().await?;
        ctx.pages.product_detail.expect_added_to_cart_dialog().await?;
        ctx.pages.product_detail.go_to_cart().await?;
        ctx.pages.cart.expect_cart_url().await?;
        ctx.pages.cart.expect_cart_not_empty().await
    })
    .await?;

    step("product is in the cart", async {
        let items = ctx.pages.cart.all_cart_items().await?;
        if items.iter().any(|item| item.matches_sku(sku)) {
            Ok(())
        } else {
            Err(E2eError::AssertionFailed(format!("sku `{sku}` missing from cart")))
        }
    })
    .await?;

    step("save the cart under a name", async {
        ctx.pages.cart.goto().await?;
        ctx.pages.cart.save_cart_as(SAVED_CART_NAME).await
    })
    .await?;

    step("confirmation and emptied cart", async {
        ctx.pages
            .cart
            .expect_message(&format!(
                "Your cart items have been successfully saved for later in the \"{SAVED_CART_NAME}\" cart"
            ))
            .await?;
        ctx.pages.cart.expect_cart_empty().await
    })
    .await?;

    step("saved cart appears in the list", async {
        ctx.pages.saved_cart.navigate_from_header().await?;
        ctx.pages.saved_cart.expect_saved_cart_in_list(SAVED_CART_NAME).await
    })
    .await?;

    step("details page shows the saved product", async {
        ctx.pages.saved_cart.open_saved_cart(SAVED_CART_NAME).await?;
        ctx.pages.saved_cart.expect_product_in_details(sku).await?;
        ctx.pages.saved_cart.expect_restore_enabled().await
    })
    .await?;

    step("restore the saved cart", ctx.pages.saved_cart.restore_cart()).await?;

    step("restored product is back in the cart", async {
        ctx.pages.cart.goto().await?;
        ctx.pages.cart.expect_cart_url().await?;
        ctx.pages.cart.expect_cart_not_empty().await?;
        ctx.pages.cart.expect_product_in_cart(sku).await
    })
    .await?;

    step("checkout is available", ctx.pages.cart.expect_checkout_enabled()).await?;

    step("cleanup: empty the cart", async {
        ctx.pages.cart.remove_all_items().await?;
        ctx.pages.cart.expect_cart_empty().await
    })
    .await
}
