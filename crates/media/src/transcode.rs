//! Re-encoding of raster uploads into their delivery format.

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::codecs::webp::WebPEncoder;
use image::DynamicImage;

use crate::error::PublishError;
use crate::format::DeliveryFormat;

/// Output of a transcode.
#[derive(Debug, Clone)]
pub struct Encoded {
    pub bytes: Vec<u8>,
    /// Pixel size of the delivered image; `None` for SVG.
    pub dimensions: Option<(u32, u32)>,
}

/// Decode `source` and re-encode it as `format`. Passthrough formats return
/// the bytes unchanged.
pub fn transcode(source: &[u8], format: DeliveryFormat) -> Result<Encoded, PublishError> {
    if format.is_passthrough() {
        return Ok(Encoded {
            bytes: source.to_vec(),
            dimensions: None,
        });
    }

    let image = image::load_from_memory(source).map_err(|e| PublishError::Decode(e.to_string()))?;
    let dimensions = (image.width(), image.height());
    let mut out = Vec::new();

    let result = match format {
        DeliveryFormat::Jpeg { quality } => {
            // JPEG has no alpha channel.
            DynamicImage::ImageRgb8(image.to_rgb8())
                .write_with_encoder(JpegEncoder::new_with_quality(&mut out, quality))
        }
        DeliveryFormat::Png => image.write_with_encoder(PngEncoder::new(&mut out)),
        DeliveryFormat::WebpLossless => DynamicImage::ImageRgba8(image.to_rgba8())
            .write_with_encoder(WebPEncoder::new_lossless(&mut out)),
        DeliveryFormat::SvgPassthrough | DeliveryFormat::VideoPassthrough => Ok(()),
    };
    result.map_err(|e| PublishError::Encode(e.to_string()))?;

    Ok(Encoded {
        bytes: out,
        dimensions: Some(dimensions),
    })
}

/// [`transcode`] on the blocking pool; decoding a large hero takes long
/// enough to stall the runtime.
pub async fn transcode_blocking(
    source: Vec<u8>,
    format: DeliveryFormat,
) -> Result<Encoded, PublishError> {
    tokio::task::spawn_blocking(move || transcode(&source, format))
        .await
        .map_err(|e| PublishError::Encode(format!("transcode task failed: {e}")))?
}
