//! Visual regression: screenshot capture, baseline comparison, diff images.
//!
//! Snapshots land in `<output>/screenshots`, committed baselines live in
//! `<output>/baselines`, and red-overlay diffs for mismatches go to
//! `<output>/diffs`. A SHA-256 equality check short-circuits the pixel walk
//! for identical captures.

use std::path::{Path, PathBuf};

use image::{GenericImageView, Pixel, RgbaImage};
use sha2::{Digest, Sha256};
use thirtyfour::By;
use tracing::{debug, info, warn};

use crate::error::{E2eError, E2eResult};
use crate::session::Session;

/// Per-channel tolerance absorbing anti-aliasing and encoder jitter.
const CHANNEL_TOLERANCE: i32 = 5;

/// Outcome of comparing a capture against its baseline.
#[derive(Debug, Clone)]
pub struct Comparison {
    pub matches: bool,
    pub diff_percent: f64,
    pub diff_pixels: u64,
    pub total_pixels: u64,
    pub diff_image: Option<RgbaImage>,
}

/// Pixel-level comparison of two images. Pure so it is unit-testable with
/// synthetic images; dimension mismatches compare the overlapping region and
/// count the remainder as different.
pub fn compare_images(actual: &RgbaImage, baseline: &RgbaImage, threshold_percent: f64) -> Comparison {
    let (aw, ah) = actual.dimensions();
    let (bw, bh) = baseline.dimensions();
    let total_pixels = u64::from(aw.max(bw)) * u64::from(ah.max(bh));

    let mut diff = RgbaImage::new(aw, ah);
    let mut diff_pixels =
        total_pixels - u64::from(aw.min(bw)) * u64::from(ah.min(bh));

    for y in 0..ah.min(bh) {
        for x in 0..aw.min(bw) {
            let a = actual.get_pixel(x, y);
            let b = baseline.get_pixel(x, y);
            if pixels_differ(a, b) {
                diff_pixels += 1;
                diff.put_pixel(x, y, image::Rgba([255, 0, 0, 255]));
            } else {
                let c = a.channels();
                diff.put_pixel(x, y, image::Rgba([c[0] / 2, c[1] / 2, c[2] / 2, 128]));
            }
        }
    }

    let diff_percent = if total_pixels == 0 {
        0.0
    } else {
        (diff_pixels as f64 / total_pixels as f64) * 100.0
    };

    Comparison {
        matches: diff_percent <= threshold_percent,
        diff_percent,
        diff_pixels,
        total_pixels,
        diff_image: (diff_pixels > 0).then_some(diff),
    }
}

fn pixels_differ(a: &image::Rgba<u8>, b: &image::Rgba<u8>) -> bool {
    a.channels()
        .iter()
        .zip(b.channels())
        .any(|(x, y)| (i32::from(*x) - i32::from(*y)).abs() > CHANNEL_TOLERANCE)
}

/// What to capture for a snapshot.
pub enum SnapshotTarget {
    FullPage,
    Element(By),
}

/// Capture + compare driver for visual scenarios.
pub struct SnapshotTester {
    baseline_dir: PathBuf,
    actual_dir: PathBuf,
    diff_dir: PathBuf,
    threshold_percent: f64,
    update_baselines: bool,
}

impl SnapshotTester {
    pub fn new(output_dir: &Path, threshold_percent: f64, update_baselines: bool) -> E2eResult<Self> {
        let tester = Self {
            baseline_dir: output_dir.join("baselines"),
            actual_dir: output_dir.join("screenshots"),
            diff_dir: output_dir.join("diffs"),
            threshold_percent,
            update_baselines,
        };
        std::fs::create_dir_all(&tester.baseline_dir)?;
        std::fs::create_dir_all(&tester.actual_dir)?;
        std::fs::create_dir_all(&tester.diff_dir)?;
        Ok(tester)
    }

    /// Capture a named snapshot and compare it against its baseline.
    ///
    /// `max_diff_pixels` loosens the percentage threshold for snapshots with
    /// small dynamic regions. Missing baselines are an error unless
    /// baseline updating is enabled, in which case the capture is adopted.
    pub async fn check(
        &self,
        session: &Session,
        name: &str,
        target: SnapshotTarget,
        max_diff_pixels: Option<u64>,
    ) -> E2eResult<()> {
        let actual_path = self.actual_dir.join(format!("{name}.png"));
        match target {
            SnapshotTarget::FullPage => session.screenshot(&actual_path).await?,
            SnapshotTarget::Element(by) => {
                let elem = session
                    .wait_visible(by, session.config().expect_timeout)
                    .await?;
                elem.screenshot(&actual_path).await?;
            }
        }

        let baseline_path = self.baseline_dir.join(format!("{name}.png"));
        if !baseline_path.exists() {
            if self.update_baselines {
                info!(%name, "adopting new baseline");
                std::fs::copy(&actual_path, &baseline_path)?;
                return Ok(());
            }
            return Err(E2eError::BaselineNotFound(
                baseline_path.to_string_lossy().into_owned(),
            ));
        }

        if self.update_baselines {
            std::fs::copy(&actual_path, &baseline_path)?;
            return Ok(());
        }

        // Identical bytes: skip the pixel walk.
        if file_sha256(&actual_path)? == file_sha256(&baseline_path)? {
            debug!(%name, "snapshot identical to baseline");
            return Ok(());
        }

        let actual = image::open(&actual_path)?.to_rgba8();
        let baseline = image::open(&baseline_path)?.to_rgba8();
        let result = compare_images(&actual, &baseline, self.threshold_percent);

        if let Some(diff_img) = &result.diff_image {
            let diff_path = self.diff_dir.join(format!("{name}-diff.png"));
            diff_img.save(&diff_path)?;
        }

        let within_pixel_budget =
            max_diff_pixels.map(|cap| result.diff_pixels <= cap).unwrap_or(false);

        if result.matches || within_pixel_budget {
            return Ok(());
        }

        warn!(
            %name,
            diff_percent = result.diff_percent,
            diff_pixels = result.diff_pixels,
            "visual regression"
        );
        Err(E2eError::ScreenshotMismatch {
            name: name.to_string(),
            diff_percent: result.diff_percent,
            threshold: self.threshold_percent,
        })
    }

    /// List committed baseline names.
    pub fn list_baselines(&self) -> E2eResult<Vec<String>> {
        let mut names = Vec::new();
        for entry in std::fs::read_dir(&self.baseline_dir)? {
            let path = entry?.path();
            if path.extension().map(|e| e == "png").unwrap_or(false) {
                if let Some(stem) = path.file_stem() {
                    names.push(stem.to_string_lossy().into_owned());
                }
            }
        }
        names.sort();
        Ok(names)
    }
}

fn file_sha256(path: &Path) -> E2eResult<String> {
    let data = std::fs::read(path)?;
    Ok(hex::encode(Sha256::digest(&data)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(w: u32, h: u32, rgba: [u8; 4]) -> RgbaImage {
        RgbaImage::from_pixel(w, h, image::Rgba(rgba))
    }

    #[test]
    fn identical_images_match() {
        let a = solid(8, 8, [10, 20, 30, 255]);
        let result = compare_images(&a, &a.clone(), 0.0);
        assert!(result.matches);
        assert_eq!(result.diff_pixels, 0);
        assert!(result.diff_image.is_none());
    }

    #[test]
    fn tolerance_absorbs_antialiasing() {
        let a = solid(8, 8, [100, 100, 100, 255]);
        let b = solid(8, 8, [103, 98, 100, 255]);
        let result = compare_images(&a, &b, 0.0);
        assert!(result.matches, "within per-channel tolerance");
    }

    #[test]
    fn gross_difference_fails_and_produces_diff() {
        let a = solid(10, 10, [0, 0, 0, 255]);
        let b = solid(10, 10, [255, 255, 255, 255]);
        let result = compare_images(&a, &b, 0.5);
        assert!(!result.matches);
        assert_eq!(result.diff_pixels, 100);
        assert!((result.diff_percent - 100.0).abs() < f64::EPSILON);
        let diff = result.diff_image.expect("diff image");
        assert_eq!(*diff.get_pixel(0, 0), image::Rgba([255, 0, 0, 255]));
    }

    #[test]
    fn dimension_mismatch_counts_remainder() {
        let a = solid(10, 10, [0, 0, 0, 255]);
        let b = solid(5, 10, [0, 0, 0, 255]);
        let result = compare_images(&a, &b, 0.0);
        assert_eq!(result.total_pixels, 100);
        assert_eq!(result.diff_pixels, 50);
        assert!(!result.matches);
    }

    #[test]
    fn threshold_allows_small_drift() {
        let mut b = solid(10, 10, [0, 0, 0, 255]);
        b.put_pixel(0, 0, image::Rgba([255, 255, 255, 255]));
        let a = solid(10, 10, [0, 0, 0, 255]);
        let result = compare_images(&a, &b, 1.5);
        assert_eq!(result.diff_pixels, 1);
        assert!(result.matches, "1% drift within 1.5% threshold");
    }
}
