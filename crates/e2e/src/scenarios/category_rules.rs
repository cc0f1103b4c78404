//! Feature tier: cart category-exclusivity rules.
//!
//! The storefront refuses to mix parts, luxury goods and finished goods in
//! one cart. These scenarios verify the rejection message for each pairing
//! and that the original cart content survives the attempt.

use storefront_common::testdata::{parts, products, users};

use crate::error::E2eResult;
use crate::scenario::{step, Cleanup, Ctx, Group, Scenario, SessionMode, Tier};

const PARTS_SEPARATE: &str = "PARTS MUST BE ORDERED SEPARATELY FROM OTHER ITEMS";
const LUXURY_SAME_CART: &str = "LUXURY AND NON-LUXURY PRODUCTS CANNOT BE ADDED TO THE SAME CART";
const LUXURY_SEPARATE: &str = "LUXURY PRODUCTS SHOULD BE ORDERED SEPARATELY FROM NON-LUXURY PRODUCTS";
const LUXURY_SEPARATE_OR_PARTS: &str =
    "LUXURY PRODUCTS SHOULD BE ORDERED SEPARATELY FROM NON-LUXURY PRODUCTS OR PARTS";

pub fn groups() -> Vec<Group> {
    vec![
        Group {
            name: "finished-goods-and-parts",
            tier: Tier::Feature,
            critical: false,
            session_mode: SessionMode::SharedAuthenticated(users::finished_goods_parts),
            cleanup: Cleanup::ClearCart,
            scenarios: vec![
                Scenario {
                    name: "a part in the cart blocks adding a product",
                    run: |ctx| Box::pin(part_blocks_product(ctx)),
                },
                Scenario {
                    name: "a product in the cart blocks adding a part",
                    run: |ctx| Box::pin(product_blocks_part(ctx)),
                },
            ],
        },
        Group {
            name: "luxury-and-finished-goods",
            tier: Tier::Feature,
            critical: false,
            session_mode: SessionMode::SharedAuthenticated(users::luxury_goods),
            cleanup: Cleanup::ClearCart,
            scenarios: vec![
                Scenario {
                    name: "finished goods in the cart block a luxury product",
                    run: |ctx| Box::pin(finished_goods_block_luxury(ctx)),
                },
                Scenario {
                    name: "a luxury product in the cart blocks finished goods",
                    run: |ctx| Box::pin(luxury_blocks_finished_goods(ctx)),
                },
            ],
        },
    ]
}

/// Header-search a SKU, pick its suggestion, land on the detail page.
pub async fn open_pdp_via_search(ctx: &Ctx, code: &str) -> E2eResult<()> {
    ctx.pages.home.search_product(code).await?;
    ctx.pages.home.expect_suggestions_visible().await?;
    ctx.pages.home.select_suggestion_by_code(code).await?;
    ctx.pages.product_detail.expect_loaded().await
}

async fn part_blocks_product(ctx: Ctx) -> E2eResult<()> {
    let part = parts::PART_1;
    let product = products::BULOVA_ALL_CLOCKS;

    step("verify parts link on homepage", async {
        ctx.pages.home.goto().await?;
        ctx.pages.home.expect_category_navigation().await?;
        ctx.pages.home.expect_header_link("Parts").await
    })
    .await?;

    step("add part to cart", async {
        ctx.pages.parts_search.navigate_from_header().await?;
        ctx.pages.parts_search.search_by_model_number(part.model_number).await?;
        ctx.pages.parts_search.expect_part_in_results(part.part_number).await?;
        ctx.pages.parts_search.add_part_to_cart(part.part_number).await?;
        ctx.pages.product_detail.expect_added_to_cart_dialog().await
    })
    .await?;

    step("verify part in cart", async {
        ctx.pages.product_detail.go_to_cart().await?;
        ctx.pages.cart.expect_product_in_cart(part.part_number).await
    })
    .await?;

    step("try adding a finished-goods product", async {
        open_pdp_via_search(&ctx, product.code).await?;
        ctx.pages.product_detail.add_to_cart().await
    })
    .await?;

    step(
        "rejection message",
        ctx.pages.product_detail.expect_error_message(LUXURY_SEPARATE_OR_PARTS),
    )
    .await?;

    step("only the part remains in the cart", async {
        ctx.pages.cart.goto().await?;
        ctx.pages.cart.expect_only_product_in_cart(part.part_number).await
    })
    .await
}

async fn product_blocks_part(ctx: Ctx) -> E2eResult<()> {
    let part = parts::PART_1;
    let product = products::BULOVA_ALL_CLOCKS;

    step("add product to cart", async {
        ctx.pages.home.goto().await?;
        open_pdp_via_search(&ctx, product.code).await?;
        ctx.pages.product_detail.add_to_cart().await?;
        ctx.pages.product_detail.expect_added_to_cart_dialog().await?;
        ctx.pages.product_detail.go_to_cart().await?;
        ctx.pages.cart.expect_product_in_cart(product.code).await
    })
    .await?;

    step("try adding a part", async {
        ctx.pages.parts_search.navigate_from_header().await?;
        ctx.pages.parts_search.search_by_model_number(part.model_number).await?;
        ctx.pages.parts_search.expect_part_in_results(part.part_number).await?;
        ctx.pages.parts_search.add_part_to_cart(part.part_number).await
    })
    .await?;

    step(
        "rejection message",
        ctx.pages.product_detail.expect_error_message(PARTS_SEPARATE),
    )
    .await?;

    step("only the product remains in the cart", async {
        ctx.pages.cart.goto().await?;
        ctx.pages.cart.expect_only_product_in_cart(product.code).await
    })
    .await
}

async fn finished_goods_block_luxury(ctx: Ctx) -> E2eResult<()> {
    let goods = products::BULOVA_ALL_CLOCKS;
    let luxury = products::LUXURY_TOURBILLON;

    step("add finished goods to cart", async {
        ctx.pages.home.goto().await?;
        open_pdp_via_search(&ctx, goods.code).await?;
        ctx.pages.product_detail.add_to_cart().await?;
        ctx.pages.product_detail.expect_added_to_cart_dialog().await?;
        ctx.pages.product_detail.go_to_cart().await?;
        ctx.pages.cart.expect_product_in_cart(goods.code).await
    })
    .await?;

    step("try adding the luxury product", async {
        open_pdp_via_search(&ctx, luxury.code).await?;
        ctx.pages.product_detail.add_to_cart().await
    })
    .await?;

    step(
        "rejection message",
        ctx.pages.product_detail.expect_error_message(LUXURY_SAME_CART),
    )
    .await?;

    step("only finished goods remain in the cart", async {
        ctx.pages.cart.goto().await?;
        ctx.pages.cart.expect_only_product_in_cart(goods.code).await
    })
    .await
}

async fn luxury_blocks_finished_goods(ctx: Ctx) -> E2eResult<()> {
    let goods = products::BULOVA_ALL_CLOCKS;
    let luxury = products::LUXURY_TOURBILLON;

    step("add luxury product to cart", async {
        ctx.pages.home.goto().await?;
        open_pdp_via_search(&ctx, luxury.code).await?;
        ctx.pages.product_detail.add_to_cart().await?;
        ctx.pages.product_detail.expect_added_to_cart_dialog().await?;
        ctx.pages.product_detail.go_to_cart().await?;
        ctx.pages.cart.expect_product_in_cart(luxury.code).await
    })
    .await?;

    step("try adding finished goods", async {
        open_pdp_via_search(&ctx, goods.code).await?;
        ctx.pages.product_detail.add_to_cart().await
    })
    .await?;

    step(
        "rejection message",
        ctx.pages.product_detail.expect_error_message(LUXURY_SEPARATE),
    )
    .await?;

    step("only the luxury product remains in the cart", async {
        ctx.pages.cart.goto().await?;
        ctx.pages.cart.expect_only_product_in_cart(luxury.code).await
    })
    .await
}
