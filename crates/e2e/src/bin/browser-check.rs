//! Environment diagnostic: can this host reach the WebDriver endpoint and
//! launch a browser session at all?
//!
//! Useful when the suite fails before any scenario runs (fresh CI images,
//! container sandbox problems). Prints findings and exits non-zero only
//! when no launch strategy works.

use std::time::Duration;

use anyhow::{Context, Result};
use thirtyfour::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    let webdriver_url =
        std::env::var("WEBDRIVER_URL").unwrap_or_else(|_| "http://localhost:9515".to_string());

    println!("webdriver endpoint: {webdriver_url}");
    for var in ["BASE_URL", "CI", "DOCKER", "CF_INSTANCE_INDEX", "HEADLESS"] {
        match std::env::var(var) {
            Ok(value) => println!("  {var}={value}"),
            Err(_) => println!("  {var} unset"),
        }
    }

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(5))
        .build()?;
    let status_url = format!("{}/status", webdriver_url.trim_end_matches('/'));
    let status = client
        .get(&status_url)
        .send()
        .await
        .with_context(|| format!("GET {status_url}"))?;
    println!("status endpoint: HTTP {}", status.status());

    let strategies: [(&str, &[&str]); 2] = [
        ("default headless", &["--headless=new"]),
        (
            "container flags",
            &[
                "--headless=new",
                "--disable-dev-shm-usage",
                "--no-sandbox",
                "--disable-setuid-sandbox",
                "--disable-gpu",
            ],
        ),
    ];

    let mut launched = false;
    for (label, flags) in strategies {
        match try_launch(&webdriver_url, flags).await {
            Ok(()) => {
                println!("launch `{label}`: ok");
                launched = true;
            }
            Err(e) => println!("launch `{label}`: failed: {e}"),
        }
    }

    if launched {
        Ok(())
    } else {
        anyhow::bail!("no launch strategy produced a browser session")
    }
}

async fn try_launch(webdriver_url: &str, flags: &[&str]) -> Result<()> {
    let mut caps = DesiredCapabilities::chrome();
    for flag in flags {
        caps.add_arg(flag)?;
    }
    let driver = WebDriver::new(webdriver_url, caps).await?;
    let title_probe = driver.title().await;
    driver.quit().await?;
    title_probe.context("session opened but title query failed")?;
    Ok(())
}
