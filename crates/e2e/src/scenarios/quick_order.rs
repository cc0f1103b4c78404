//! Feature tier: quick-order bulk entry, the ten-row cap, list clearing,
//! export/template downloads and CSV import.

use std::io::Write;

use storefront_common::testdata::{quick_order, users};

use crate::error::{E2eError, E2eResult};
use crate::pages::quick_order::import_csv;
use crate::scenario::{step, Cleanup, Ctx, Group, Scenario, SessionMode, Tier};

const LIST_CLEARED: &str = "Quick order list has been cleared";

pub fn groups() -> Vec<Group> {
    vec![Group {
        name: "quick-order",
        tier: Tier::Feature,
        critical: false,
        session_mode: SessionMode::SharedAuthenticated(users::quick_order),
        cleanup: Cleanup::None,
        scenarios: vec![Scenario {
            name: "bulk entry, row cap, clearing and csv import",
            run: |ctx| Box::pin(quick_order_workflow(ctx)),
        }],
    }]
}

async fn quick_order_workflow(ctx: Ctx) -> E2eResult<()> {
    step("quick order link on homepage", async {
        ctx.pages.home.goto().await?;
        ctx.pages.home.expect_homepage_loaded().await?;
        ctx.pages.home.expect_header_link("Quick Order").await
    })
    .await?;

    step("open quick order page", async {
        ctx.pages.quick_order.goto().await?;
        ctx.pages.quick_order.expect_loaded().await
    })
    .await?;

    step("add ten products", async {
        for code in quick_order::PRODUCTS {
            ctx.pages.quick_order.search_and_select_product(code).await?;
        }
        Ok(())
    })
    .await?;

    step("table holds exactly the ten codes", async {
        let count = ctx.pages.quick_order.product_count().await?;
        if count != quick_order::PRODUCTS.len() {
            return Err(E2eError::AssertionFailed(format!(
                "expected {} rows, found {count}",
                quick_order::PRODUCTS.len()
            )));
        }
        let expected: Vec<&str> = quick_order::PRODUCTS.to_vec();
        ctx.pages.quick_order.expect_products_loaded(&expected).await
    })
    .await?;

    step("the eleventh product trips the cap notice", async {
        ctx.pages.quick_order.fill_product_input(quick_order::OVERFLOW_PRODUCT).await?;
        ctx.pages.quick_order.expect_max_products_message().await?;
        let count = ctx.pages.quick_order.product_count().await?;
        if count == quick_order::PRODUCTS.len() {
            Ok(())
        } else {
            Err(E2eError::AssertionFailed(format!(
                "table changed to {count} rows after the capped attempt"
            )))
        }
    })
    .await?;

    step("reset clears the input", async {
        ctx.pages.quick_order.click_reset().await?;
        ctx.pages.quick_order.expect_input_empty().await
    })
    .await?;

    step("export downloads without error", ctx.pages.quick_order.export_products()).await?;

    step("empty the list", async {
        ctx.pages.quick_order.click_empty_list().await?;
        ctx.pages.quick_order.expect_info_message(LIST_CLEARED).await?;
        ctx.pages.quick_order.expect_table_empty().await
    })
    .await?;

    step("template downloads without error", ctx.pages.quick_order.download_template()).await?;

    step("import button available", ctx.pages.quick_order.expect_import_button_visible()).await?;

    let csv_file = step("write the import csv", async {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile()?;
        let expected: Vec<&str> = quick_order::PRODUCTS.to_vec();
        file.write_all(import_csv(&expected, 1).as_bytes())?;
        file.flush()?;
        Ok(file)
    })
    .await?;

    step("import products from the csv", async {
        ctx.pages.quick_order.import_products_from_file(csv_file.path()).await?;
        ctx.pages
            .quick_order
            .expect_import_summary(quick_order::PRODUCTS.len(), quick_order::PRODUCTS.len())
            .await?;
        ctx.pages.quick_order.close_import_dialog().await
    })
    .await?;

    step("imported rows match the csv", async {
        let expected: Vec<&str> = quick_order::PRODUCTS.to_vec();
        ctx.pages.quick_order.expect_products_loaded(&expected).await
    })
    .await?;

    step("empty the list again", async {
        ctx.pages.quick_order.click_empty_list().await?;
        ctx.pages.quick_order.expect_info_message(LIST_CLEARED).await?;
        ctx.pages.quick_order.expect_table_empty().await
    })
    .await
}
