//! Smoke tier: login, forgot password, the critical checkout path, and
//! the static navigation surfaces (footer, My Account menu).

use storefront_common::testdata::{checkout, products, users};

use crate::error::{E2eError, E2eResult};
use crate::pages::home::LinkInfo;
use crate::scenario::{step, Cleanup, Ctx, Group, Scenario, SessionMode, Tier};

const RESET_EMAIL: &str = "ana.katja@yopmail.com";

const EXPECTED_RESOURCES_LINKS: &[(&str, &str)] = &[
    ("Brand Assets", "https://qa.coa-retailers.com/brand-assets"),
    ("Catalogs", "https://www.coa-retailers.com/product-catalogs"),
    ("Policies", "https://www.coa-retailers.com/policies"),
    ("Corporate Sales", "https://www.cwacorporatesales.com/"),
    (
        "Setting Instructions / Manuals & Watch Care",
        "https://www.coa-retailers.com/setting-instructions-manuals-watch-care",
    ),
    ("About Citizen Watch Group", "https://www.coa-retailers.com/about"),
    ("CWA Institute", "https://cwa-institute.litmos.com/cA"),
    ("Email Signup", "https://www.coa-retailers.com"),
];

const EXPECTED_SUPPORT_LINKS: &[(&str, &str)] = &[
    ("B2B Help", "https://support.citizenwatchgroup.com/hc/en-us"),
    ("Contact Us", "https://www.coa-retailers.com/contact-us/"),
];

const EXPECTED_MENU_ITEMS: &[(&str, &str)] = &[
    ("Account Overview", "/cwa/en/USD/my-account/update-profile"),
    ("Sales Orders", "/cwa/en/USD/my-account/orders"),
    ("Return Orders", "/cwa/en/USD/my-account/return-orders"),
    ("Payment History", "/cwa/en/USD/my-account/payment-history"),
    ("Transactions / Bill Pay", "/cwa/en/USD/my-account/invoices"),
    ("My Deliveries", "/cwa/en/USD/my-account/deliveries"),
    ("Wishlist", "/cwa/en/USD/my-account/wishlist"),
    ("Change Password", "/cwa/en/USD/my-account/update-password"),
    ("Consent Management", "/cwa/en/USD/my-account/consents"),
    ("Service Portal", "/cwa/en/USD/service-portal/service-requests"),
    ("My Coupons", "/cwa/en/USD/my-account/coupons"),
    ("Notification Preference", "/cwa/en/USD/my-account/notification-preference"),
    ("Logout", "/cwa/en/USD/logout"),
];

pub fn groups() -> Vec<Group> {
    vec![
        Group {
            name: "login",
            tier: Tier::Smoke,
            critical: false,
            session_mode: SessionMode::Isolated,
            cleanup: Cleanup::None,
            scenarios: vec![
                Scenario {
                    name: "login page shows all required elements",
                    run: |ctx| Box::pin(login_page_elements(ctx)),
                },
                Scenario {
                    name: "valid credentials land on the homepage",
                    run: |ctx| Box::pin(valid_credentials(ctx)),
                },
                Scenario {
                    name: "invalid credentials stay on login with an error",
                    run: |ctx| Box::pin(invalid_credentials(ctx)),
                },
            ],
        },
        Group {
            name: "forgot-password",
            tier: Tier::Smoke,
            critical: false,
            session_mode: SessionMode::Isolated,
            cleanup: Cleanup::None,
            scenarios: vec![
                Scenario {
                    name: "reset button is visible on the login page",
                    run: |ctx| Box::pin(reset_button_visible(ctx)),
                },
                Scenario {
                    name: "reset dialog shows instructions and input",
                    run: |ctx| Box::pin(reset_dialog_contents(ctx)),
                },
                Scenario {
                    name: "submitting a reset request confirms by email",
                    run: |ctx| Box::pin(submit_reset_request(ctx)),
                },
            ],
        },
        Group {
            name: "checkout-critical",
            tier: Tier::Smoke,
            critical: true,
            session_mode: SessionMode::SharedAuthenticated(users::valid),
            cleanup: Cleanup::ClearCart,
            scenarios: vec![Scenario {
                name: "full checkout journey ends in an order confirmation",
                run: |ctx| Box::pin(full_checkout_journey(ctx)),
            }],
        },
        Group {
            name: "footer-links",
            tier: Tier::Smoke,
            critical: false,
            session_mode: SessionMode::SharedAuthenticated(users::valid),
            cleanup: Cleanup::None,
            scenarios: vec![
                Scenario {
                    name: "footer shows Resources and Support links in order",
                    run: |ctx| Box::pin(footer_sections_and_links(ctx)),
                },
                Scenario {
                    name: "footer links open in a new tab",
                    run: |ctx| Box::pin(footer_links_open_new_tab(ctx)),
                },
            ],
        },
        Group {
            name: "my-account-links",
            tier: Tier::Smoke,
            critical: false,
            session_mode: SessionMode::SharedAuthenticated(users::valid),
            cleanup: Cleanup::None,
            scenarios: vec![
                Scenario {
                    name: "account dropdown lists every link in order",
                    run: |ctx| Box::pin(dropdown_links_in_order(ctx)),
                },
                Scenario {
                    name: "account sidebar lists every link after opening overview",
                    run: |ctx| Box::pin(sidebar_links_after_overview(ctx)),
                },
            ],
        },
    ]
}

// ---- login ------------------------------------------------------------

async fn login_page_elements(ctx: Ctx) -> E2eResult<()> {
    ctx.pages.login.goto().await?;
    step("verify page title", ctx.session.wait_title_is("Login", ctx.cfg.expect_timeout)).await?;
    step("verify banner", ctx.pages.login.expect_banner_visible()).await?;
    step("verify login form", ctx.pages.login.expect_login_form_visible()).await
}

async fn valid_credentials(ctx: Ctx) -> E2eResult<()> {
    ctx.pages.login.goto().await?;
    step("log in", ctx.pages.login.login_and_wait(&users::valid())).await?;
    step("verify homepage title", ctx.pages.home.expect_homepage_loaded()).await
}

async fn invalid_credentials(ctx: Ctx) -> E2eResult<()> {
    ctx.pages.login.goto().await?;
    step("log in with bad credentials", ctx.pages.login.login(&users::invalid())).await?;
    step("still on login page", ctx.pages.login.expect_still_on_login()).await?;
    step("error banner", ctx.pages.login.expect_error_message("bad credentials")).await
}

// ---- forgot password ----------------------------------------------------

async fn reset_button_visible(ctx: Ctx) -> E2eResult<()> {
    ctx.pages.login.goto().await?;
    step("verify page title", ctx.session.wait_title_is("Login", ctx.cfg.expect_timeout)).await?;
    step("reset button visible", ctx.pages.login.expect_forgot_password_button_visible()).await
}

async fn reset_dialog_contents(ctx: Ctx) -> E2eResult<()> {
    ctx.pages.login.goto().await?;
    step("open dialog", ctx.pages.login.open_forgot_password()).await?;
    step(
        "dialog title",
        ctx.pages.login.expect_forgot_password_dialog_text("Password Reset Request"),
    )
    .await?;
    step(
        "dialog instructions",
        ctx.pages.login.expect_forgot_password_dialog_text(
            "Please enter your email address below. You will receive a link to reset your password",
        ),
    )
    .await
}

async fn submit_reset_request(ctx: Ctx) -> E2eResult<()> {
    ctx.pages.login.goto().await?;
    step("open dialog", ctx.pages.login.open_forgot_password()).await?;
    step("submit email", ctx.pages.login.submit_forgot_password(RESET_EMAIL)).await?;
    step(
        "confirmation banner",
        ctx.pages.login.expect_success_message(
            "Please check your email for a link to reset your password. The link will expire in 30 min",
        ),
    )
    .await
}

// ---- checkout critical path ---------------------------------------------

async fn full_checkout_journey(ctx: Ctx) -> E2eResult<()> {
    let product = products::BULOVA_ALL_CLOCKS;

    ctx.pages.home.goto().await?;
    step("open brand menu", ctx.pages.home.navigate_to_brand(product.brand)).await?;
    step("open collection", ctx.pages.home.navigate_to_collection(product.collection)).await?;
    step("select product", ctx.pages.product_list.select_product_by_code(product.code)).await?;

    step("add to cart", async {
        ctx.pages.product_detail.add_to_cart().await?;
        ctx.pages.product_detail.expect_added_to_cart_dialog().await?;
        ctx.pages.product_detail.go_to_cart().await
    })
    .await?;

    step("proceed to checkout", async {
        ctx.pages.cart.goto().await?;
        ctx.pages.cart.expect_cart_url().await?;
        ctx.pages.cart.proceed_to_checkout().await?;
        ctx.pages.checkout.expect_delivery_address_step().await
    })
    .await?;

    step("delivery address", ctx.pages.checkout.continue_from_delivery_address()).await?;

    step("delivery mode and order details", async {
        ctx.pages.checkout.fill_delivery_mode_details(checkout::PO_NUMBER).await?;
        ctx.pages.checkout.continue_from_delivery_mode().await
    })
    .await?;

    step("review and place order", async {
        ctx.pages.checkout.accept_terms_and_conditions().await?;
        ctx.pages.checkout.place_order().await
    })
    .await?;

    step("order confirmation", ctx.pages.checkout.expect_order_confirmation()).await
}

// ---- footer --------------------------------------------------------------

fn verify_link_order(actual: &[LinkInfo], expected: &[(&str, &str)]) -> E2eResult<()> {
    let actual_pairs: Vec<(&str, &str)> =
        actual.iter().map(|l| (l.text.as_str(), l.href.as_str())).collect();
    let expected_pairs: Vec<(&str, &str)> = expected.to_vec();
    if actual_pairs == expected_pairs {
        Ok(())
    } else {
        Err(E2eError::AssertionFailed(format!(
            "link order mismatch:\n  expected {expected_pairs:?}\n  got      {actual_pairs:?}"
        )))
    }
}

async fn footer_sections_and_links(ctx: Ctx) -> E2eResult<()> {
    ctx.pages.home.goto().await?;
    step("footer visible", ctx.pages.home.expect_footer_visible()).await?;

    let resources = step("collect Resources links", ctx.pages.home.footer_links("Resources")).await?;
    step("Resources link order", async { verify_link_order(&resources, EXPECTED_RESOURCES_LINKS) })
        .await?;

    let support = step("collect Support links", ctx.pages.home.footer_links("Support")).await?;
    step("Support link order", async { verify_link_order(&support, EXPECTED_SUPPORT_LINKS) }).await
}

async fn footer_links_open_new_tab(ctx: Ctx) -> E2eResult<()> {
    ctx.pages.home.goto().await?;
    for section in ["Resources", "Support"] {
        let links = ctx.pages.home.footer_links(section).await?;
        for link in links {
            if link.target.as_deref() != Some("_blank") {
                return Err(E2eError::AssertionFailed(format!(
                    "footer link `{}` in {section} does not open a new tab",
                    link.text
                )));
            }
        }
    }
    Ok(())
}

// ---- My Account navigation ------------------------------------------------

async fn dropdown_links_in_order(ctx: Ctx) -> E2eResult<()> {
    ctx.pages.home.goto().await?;
    step("open dropdown", ctx.pages.home.open_my_account_menu()).await?;
    let links = step("collect links", ctx.pages.home.my_account_menu_links()).await?;
    step("link order", async { verify_link_order(&links, EXPECTED_MENU_ITEMS) }).await?;
    step("close dropdown", ctx.pages.home.close_my_account_menu()).await
}

async fn sidebar_links_after_overview(ctx: Ctx) -> E2eResult<()> {
    ctx.pages.home.goto().await?;
    step("open dropdown", ctx.pages.home.open_my_account_menu()).await?;
    step(
        "open account overview",
        ctx.pages.home.follow_my_account_link("/cwa/en/USD/my-account/update-profile"),
    )
    .await?;
    step("sidebar visible", ctx.pages.home.expect_account_sidebar()).await?;
    let links = step("collect sidebar links", ctx.pages.home.account_sidebar_link_infos()).await?;
    step("sidebar link order", async { verify_link_order(&links, EXPECTED_MENU_ITEMS) }).await
}
