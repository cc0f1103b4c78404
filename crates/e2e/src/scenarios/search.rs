//! Feature tier: global search, suggestions and navigation to the detail
//! page, exercised end to end in one session.

use storefront_common::testdata::{products, users};

use crate::error::{E2eError, E2eResult};
use crate::scenario::{step, Cleanup, Ctx, Group, Scenario, SessionMode, Tier};

/// The suggestion dropdown never shows more than five entries.
const MAX_SUGGESTIONS: usize = 5;

pub fn groups() -> Vec<Group> {
    vec![Group {
        name: "global-search",
        tier: Tier::Feature,
        critical: false,
        session_mode: SessionMode::SharedAuthenticated(users::global_search),
        cleanup: Cleanup::None,
        scenarios: vec![Scenario {
            name: "search by sku, name, invalid input and suggestion navigation",
            run: |ctx| Box::pin(comprehensive_search(ctx)),
        }],
    }]
}

async fn comprehensive_search(ctx: Ctx) -> E2eResult<()> {
    let corso = products::CORSO;
    let chandler = products::CHANDLER;

    step("homepage with search bar", async {
        ctx.pages.home.goto().await?;
        ctx.pages.home.expect_homepage_loaded().await
    })
    .await?;

    step(
        "search placeholder",
        ctx.pages.home.expect_search_placeholder("Search by Product Name, SKU, Keyword"),
    )
    .await?;

    step("sku query lists a matching suggestion", async {
        ctx.pages.home.search_product(corso.code).await?;
        ctx.pages.home.expect_suggestions_visible().await?;
        ctx.pages.home.expect_suggestion_containing(&format!("ID {}", corso.code)).await
    })
    .await?;

    step("clear via the reset button", ctx.pages.home.clear_search()).await?;

    step("name query lists a matching suggestion", async {
        ctx.pages.home.search_product(corso.name).await?;
        ctx.pages.home.expect_suggestions_visible().await?;
        ctx.pages.home.expect_suggestion_containing(corso.name).await
    })
    .await?;

    step("clear again", ctx.pages.home.clear_search()).await?;

    step("unknown query shows the no-results notice", async {
        ctx.pages.home.search_product("NONEXISTS").await?;
        ctx.pages.home.expect_no_search_results().await
    })
    .await?;

    step("clear after the failed query", ctx.pages.home.clear_search()).await?;

    step("partial sku caps the dropdown at five entries", async {
        ctx.pages.home.search_product("AT2").await?;
        let count = ctx.pages.home.suggestion_count().await?;
        if count == 0 || count > MAX_SUGGESTIONS {
            return Err(E2eError::AssertionFailed(format!(
                "expected 1..={MAX_SUGGESTIONS} suggestions, found {count}"
            )));
        }
        Ok(())
    })
    .await?;

    step("suggestion click lands on the right detail page", async {
        ctx.pages.home.search_product(chandler.code).await?;
        ctx.pages.home.expect_suggestions_visible().await?;
        ctx.pages.home.select_suggestion_by_code(chandler.code).await?;
        ctx.pages.product_detail.expect_loaded().await?;
        ctx.pages.product_detail.expect_product_code(chandler.code).await
    })
    .await?;

    step("back to the homepage", async {
        ctx.pages.home.goto().await?;
        ctx.pages.home.expect_homepage_loaded().await
    })
    .await?;

    step("submitted search renders the results grid", async {
        ctx.pages.home.search_product_and_submit(corso.code).await?;
        ctx.pages.search_results.expect_loaded().await?;
        ctx.pages.search_results.expect_product_tile(corso.code).await
    })
    .await?;

    step("result tile opens the matching detail page", async {
        ctx.pages.search_results.select_product_by_code(corso.code).await?;
        ctx.pages.product_detail.expect_loaded().await?;
        ctx.pages.product_detail.expect_product_code(corso.code).await?;
        let rendered = ctx.pages.product_detail.product_code().await?;
        if rendered.contains(corso.code) {
            Ok(())
        } else {
            Err(E2eError::AssertionFailed(format!(
                "detail page shows `{rendered}`, expected it to contain `{}`",
                corso.code
            )))
        }
    })
    .await
}
