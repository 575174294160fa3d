//! Full-image raster generation from three channel snippets.

use artree_lang::Number;
use image::{Rgba, RgbaImage};
use tokio::time::Instant;
use tracing::info;

use crate::error::EvalResult;
use crate::eval::{evaluate, PixelBindings};

/// Convert a numeric result to an 8-bit channel intensity.
///
/// The value is truncated toward zero and only its low 8 bits are kept, so
/// out-of-range values wrap rather than clamp: 256 maps to 0, -1 to 255,
/// 300.7 to 44.
pub fn channel_intensity(value: Number) -> u8 {
    value.truncate() as u8
}

/// Generate a `width` x `height` image from one snippet per color channel.
///
/// Every pixel evaluates R, then G, then B with `i`, `j` bound to its
/// coordinates and `w`, `h` to the canvas dimensions. All evaluations of
/// the whole image share the single `deadline`, so total generation time
/// stays bounded regardless of canvas size. The first failure of any kind
/// aborts generation; alpha is fixed at 0xff.
pub async fn generate(
    code_r: &str,
    code_g: &str,
    code_b: &str,
    width: u32,
    height: u32,
    deadline: Instant,
) -> EvalResult<RgbaImage> {
    let mut img = RgbaImage::new(width, height);
    let total = u64::from(width) * u64::from(height);
    let step = (total / 10).max(1);
    let mut processed: u64 = 0;

    for j in 0..height {
        for i in 0..width {
            let bindings = PixelBindings {
                i: i64::from(i),
                j: i64::from(j),
                w: i64::from(width),
                h: i64::from(height),
            };
            let r = evaluate(code_r, bindings, deadline).await?;
            let g = evaluate(code_g, bindings, deadline).await?;
            let b = evaluate(code_b, bindings, deadline).await?;
            img.put_pixel(
                i,
                j,
                Rgba([
                    channel_intensity(r),
                    channel_intensity(g),
                    channel_intensity(b),
                    0xff,
                ]),
            );

            processed += 1;
            if processed % step == 0 {
                info!(
                    processed,
                    total,
                    percent = processed * 100 / total,
                    "plot progress"
                );
            }
        }
    }

    Ok(img)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use artree_lang::LangError;

    use super::*;
    use crate::error::EvalError;

    fn far_deadline() -> Instant {
        Instant::now() + Duration::from_secs(30)
    }

    #[test]
    fn test_channel_intensity_wraps() {
        assert_eq!(channel_intensity(Number::Int(0)), 0);
        assert_eq!(channel_intensity(Number::Int(255)), 255);
        assert_eq!(channel_intensity(Number::Int(256)), 0);
        assert_eq!(channel_intensity(Number::Int(-1)), 255);
        assert_eq!(channel_intensity(Number::Real(300.7)), 44);
        assert_eq!(channel_intensity(Number::Real(127.9)), 127);
    }

    #[tokio::test]
    async fn test_generate_dimensions_and_values() {
        let img = generate("i", "j", "(+ i j)", 4, 3, far_deadline())
            .await
            .unwrap();
        assert_eq!(img.dimensions(), (4, 3));
        for j in 0..3u32 {
            for i in 0..4u32 {
                let px = img.get_pixel(i, j);
                assert_eq!(px[0], i as u8);
                assert_eq!(px[1], j as u8);
                assert_eq!(px[2], (i + j) as u8);
                assert_eq!(px[3], 0xff);
            }
        }
    }

    #[tokio::test]
    async fn test_generate_wraps_out_of_range_channels() {
        let img = generate("256", "-1", "300.7", 2, 2, far_deadline())
            .await
            .unwrap();
        let px = img.get_pixel(0, 0);
        assert_eq!((px[0], px[1], px[2]), (0, 255, 44));
    }

    #[tokio::test]
    async fn test_generate_fails_whole_image_on_parse_error() {
        let err = generate("i", "(+ 1", "j", 4, 4, far_deadline())
            .await
            .unwrap_err();
        assert!(err.is_parse());
    }

    #[tokio::test]
    async fn test_generate_fails_whole_image_on_runtime_error() {
        // `(% i j)` divides by zero at the very first pixel (j = 0).
        let err = generate("i", "j", "(% i j)", 4, 4, far_deadline())
            .await
            .unwrap_err();
        assert_eq!(
            err,
            EvalError::Lang(LangError::Arithmetic {
                function: "%",
                message: "remainder by zero",
            })
        );
    }

    #[tokio::test]
    async fn test_generate_shares_one_deadline() {
        let past = Instant::now() - Duration::from_millis(1);
        let err = generate("i", "j", "(+ i j)", 8, 8, past).await.unwrap_err();
        assert_eq!(err, EvalError::DeadlineExceeded);
    }
}
