//! Visual tier: pixel-comparison snapshots of the login screen in its
//! resting, filled and error states, across several viewports.

use storefront_common::testdata::users;
use thirtyfour::By;

use crate::error::E2eResult;
use crate::scenario::{step, Cleanup, Ctx, Group, Scenario, SessionMode, Tier};
use crate::visual::SnapshotTarget;

/// Pixel allowance for snapshots with small dynamic regions.
const PIXEL_BUDGET: u64 = 100;

pub fn groups() -> Vec<Group> {
    vec![Group {
        name: "login-visual",
        tier: Tier::Visual,
        critical: false,
        session_mode: SessionMode::Isolated,
        cleanup: Cleanup::None,
        scenarios: vec![
            Scenario {
                name: "login page matches its baseline",
                run: |ctx| Box::pin(full_page(ctx)),
            },
            Scenario {
                name: "login form matches its baseline",
                run: |ctx| Box::pin(form(ctx)),
            },
            Scenario {
                name: "login banner matches its baseline",
                run: |ctx| Box::pin(banner(ctx)),
            },
            Scenario {
                name: "login button matches its baseline",
                run: |ctx| Box::pin(button(ctx)),
            },
            Scenario {
                name: "login page matches across viewports",
                run: |ctx| Box::pin(viewports(ctx)),
            },
            Scenario {
                name: "login page with an error matches its baseline",
                run: |ctx| Box::pin(error_state(ctx)),
            },
            Scenario {
                name: "filled login form matches its baseline",
                run: |ctx| Box::pin(filled_form(ctx)),
            },
            Scenario {
                name: "login page matches within the pixel budget",
                run: |ctx| Box::pin(pixel_budget(ctx)),
            },
        ],
    }]
}

async fn full_page(ctx: Ctx) -> E2eResult<()> {
    ctx.pages.login.goto().await?;
    ctx.visual
        .check(&ctx.session, "login-page-full", SnapshotTarget::FullPage, None)
        .await
}

async fn form(ctx: Ctx) -> E2eResult<()> {
    ctx.pages.login.goto().await?;
    ctx.visual
        .check(
            &ctx.session,
            "login-form",
            SnapshotTarget::Element(By::Css("cw-login-form")),
            None,
        )
        .await
}

async fn banner(ctx: Ctx) -> E2eResult<()> {
    ctx.pages.login.goto().await?;
    ctx.visual
        .check(
            &ctx.session,
            "login-banner",
            SnapshotTarget::Element(By::Css("cx-banner")),
            None,
        )
        .await
}

async fn button(ctx: Ctx) -> E2eResult<()> {
    ctx.pages.login.goto().await?;
    ctx.visual
        .check(
            &ctx.session,
            "login-button",
            SnapshotTarget::Element(By::Css("cw-login-form button[type='submit']")),
            None,
        )
        .await
}

async fn viewports(ctx: Ctx) -> E2eResult<()> {
    ctx.pages.login.goto().await?;
    for (name, width, height) in [
        ("login-page-desktop", 1920u32, 1080u32),
        ("login-page-tablet", 768, 1024),
        ("login-page-mobile", 375, 667),
    ] {
        step(name, async {
            ctx.session.set_viewport(width, height).await?;
            ctx.visual.check(&ctx.session, name, SnapshotTarget::FullPage, None).await
        })
        .await?;
    }
    ctx.session
        .set_viewport(ctx.cfg.viewport_width, ctx.cfg.viewport_height)
        .await
}

async fn error_state(ctx: Ctx) -> E2eResult<()> {
    ctx.pages.login.goto().await?;
    ctx.pages.login.login(&users::invalid()).await?;
    ctx.pages.login.expect_error_message("bad credentials").await?;
    ctx.visual
        .check(&ctx.session, "login-page-with-error", SnapshotTarget::FullPage, None)
        .await
}

async fn filled_form(ctx: Ctx) -> E2eResult<()> {
    ctx.pages.login.goto().await?;
    ctx.session
        .fill(By::Css("cw-login-form input[formcontrolname='userId']"), "test@example.com")
        .await?;
    ctx.session
        .fill(By::Css("cw-login-form input[formcontrolname='password']"), "password123")
        .await?;
    ctx.visual
        .check(
            &ctx.session,
            "login-form-filled",
            SnapshotTarget::Element(By::Css("cw-login-form")),
            None,
        )
        .await
}

async fn pixel_budget(ctx: Ctx) -> E2eResult<()> {
    ctx.pages.login.goto().await?;
    ctx.visual
        .check(
            &ctx.session,
            "login-page-threshold",
            SnapshotTarget::FullPage,
            Some(PIXEL_BUDGET),
        )
        .await
}
