//! Cover-art palette extraction.
//!
//! Decoding happens outside this crate: callers hand in a future that resolves
//! to a [`PixelBuffer`]. Each call to [`PaletteExtractor::extract_palette`]
//! takes a ticket from a generation counter when it is issued, and a finished
//! extraction is only applied if no newer request has been issued since.

use std::{
    future::Future,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc, Mutex, MutexGuard,
    },
};

use crate::{
    cluster::dominant_color,
    config::ColorConfig,
    palette::{generate_scheme, Palette},
    sampler::{sample, PixelBuffer, SamplerSettings},
    LyricCanvasError, Result,
};

/// Runs sampling, clustering and scheme generation on an already decoded
/// image.
pub fn palette_from_pixels(pixels: &PixelBuffer, config: &ColorConfig) -> Result<Palette> {
    let samples = sample(pixels, &SamplerSettings::from(config))?;
    let base = dominant_color(&samples, config.clusters, config.iterations, config.fallback)?;
    Ok(generate_scheme(base, config.policy))
}

/// Generation number handed out when an extraction request is issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RequestToken(u64);

impl RequestToken {
    pub fn generation(self) -> u64 {
        self.0
    }
}

/// Result of an extraction that did not fail.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ExtractOutcome {
    /// The palette was computed and is now the current one.
    Applied(Palette),
    /// A newer request was issued before this one finished; its result was
    /// discarded.
    Superseded,
}

#[derive(Debug)]
struct AppliedPalette {
    generation: u64,
    palette: Palette,
}

/// Shared palette state for one background. Cloning yields another handle to
/// the same state.
#[derive(Debug, Clone)]
pub struct PaletteExtractor {
    config: ColorConfig,
    latest: Arc<AtomicU64>,
    applied: Arc<Mutex<AppliedPalette>>,
}

impl PaletteExtractor {
    pub fn new(config: ColorConfig) -> Self {
        Self {
            config,
            latest: Arc::new(AtomicU64::new(0)),
            applied: Arc::new(Mutex::new(AppliedPalette {
                generation: 0,
                palette: Palette::default_scheme(),
            })),
        }
    }

    pub fn config(&self) -> &ColorConfig {
        &self.config
    }

    /// Issues a new request, invalidating every earlier one.
    pub fn begin(&self) -> RequestToken {
        RequestToken(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Returns `true` if no request has been issued after `token`.
    pub fn is_current(&self, token: RequestToken) -> bool {
        self.latest.load(Ordering::SeqCst) == token.0
    }

    /// The most recently applied palette, or the default scheme if nothing
    /// has been applied yet.
    pub fn current_palette(&self) -> Result<Palette> {
        Ok(self.lock_applied()?.palette)
    }

    /// Issues a request immediately and returns a future that waits for
    /// `decode`, then computes and applies the palette unless the request was
    /// superseded in the meantime.
    ///
    /// Decode failures of the current request are returned as
    /// [`LyricCanvasError::Decode`] and leave the applied palette untouched.
    pub fn extract_palette<F>(&self, decode: F) -> impl Future<Output = Result<ExtractOutcome>>
    where
        F: Future<Output = Result<PixelBuffer>>,
    {
        let token = self.begin();
        let this = self.clone();
        async move {
            let decoded = decode.await;
            this.complete(token, decoded)
        }
    }

    /// Finishes a request started with [`PaletteExtractor::begin`].
    pub fn complete(
        &self,
        token: RequestToken,
        decoded: Result<PixelBuffer>,
    ) -> Result<ExtractOutcome> {
        if !self.is_current(token) {
            tracing::debug!(generation = token.0, "discarding superseded palette extraction");
            return Ok(ExtractOutcome::Superseded);
        }

        let pixels = decoded.map_err(|err| {
            tracing::warn!(generation = token.0, error = %err, "cover decode failed");
            match err {
                LyricCanvasError::Decode(message) => LyricCanvasError::Decode(message),
                other => LyricCanvasError::decode(other),
            }
        })?;

        let palette = palette_from_pixels(&pixels, &self.config)?;

        let mut applied = self.lock_applied()?;
        // Re-check under the lock so a newer request that finished first is
        // never overwritten.
        if !self.is_current(token) || applied.generation > token.0 {
            tracing::debug!(generation = token.0, "discarding superseded palette extraction");
            return Ok(ExtractOutcome::Superseded);
        }
        applied.generation = token.0;
        applied.palette = palette;
        tracing::debug!(generation = token.0, "applied extracted palette");
        Ok(ExtractOutcome::Applied(palette))
    }

    fn lock_applied(&self) -> Result<MutexGuard<'_, AppliedPalette>> {
        self.applied
            .lock()
            .map_err(|_| LyricCanvasError::msg("palette state has been poisoned"))
    }
}

impl Default for PaletteExtractor {
    fn default() -> Self {
        Self::new(ColorConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use tokio::sync::oneshot;

    use super::*;
    use crate::{
        color::Rgb,
        palette::{PaletteColor, SchemePolicy},
    };

    fn solid(rgb: [u8; 3]) -> PixelBuffer {
        PixelBuffer::filled(16, 16, [rgb[0], rgb[1], rgb[2], 255])
    }

    async fn receive(rx: oneshot::Receiver<PixelBuffer>) -> Result<PixelBuffer> {
        rx.await.map_err(LyricCanvasError::decode)
    }

    fn base_color(palette: &Palette) -> Rgb {
        palette.colors[1].to_rgb()
    }

    #[test]
    fn computes_palette_from_pixels() {
        let palette = palette_from_pixels(&solid([200, 100, 50]), &ColorConfig::default()).unwrap();
        assert_eq!(palette.colors[1], PaletteColor::Rgb(Rgb::new(200, 100, 50)));
    }

    #[test]
    fn fully_excluded_image_uses_fallback_color() {
        let config = ColorConfig {
            policy: SchemePolicy::LightnessBlend,
            ..ColorConfig::default()
        };
        let palette = palette_from_pixels(&solid([0, 0, 0]), &config).unwrap();
        assert_eq!(base_color(&palette), config.fallback);
    }

    #[tokio::test]
    async fn applies_the_latest_request() {
        let extractor = PaletteExtractor::default();
        let pixels = solid([30, 160, 60]);

        let outcome = extractor
            .extract_palette(async move { Ok(pixels) })
            .await
            .unwrap();

        let ExtractOutcome::Applied(palette) = outcome else {
            panic!("expected the palette to be applied");
        };
        assert_eq!(base_color(&palette), Rgb::new(30, 160, 60));
        assert_eq!(extractor.current_palette().unwrap(), palette);
    }

    #[tokio::test]
    async fn stale_completion_after_newer_one_is_discarded() {
        let extractor = PaletteExtractor::default();
        let (tx_old, rx_old) = oneshot::channel::<PixelBuffer>();
        let (tx_new, rx_new) = oneshot::channel::<PixelBuffer>();

        let old = extractor.extract_palette(receive(rx_old));
        let new = extractor.extract_palette(receive(rx_new));

        tx_new.send(solid([0, 0, 200])).unwrap();
        assert!(matches!(new.await.unwrap(), ExtractOutcome::Applied(_)));

        tx_old.send(solid([200, 0, 0])).unwrap();
        assert_eq!(old.await.unwrap(), ExtractOutcome::Superseded);

        let current = extractor.current_palette().unwrap();
        assert_eq!(base_color(&current), Rgb::new(0, 0, 200));
    }

    #[tokio::test]
    async fn stale_completion_before_newer_one_is_discarded() {
        let extractor = PaletteExtractor::default();
        let (tx_old, rx_old) = oneshot::channel::<PixelBuffer>();
        let (tx_new, rx_new) = oneshot::channel::<PixelBuffer>();

        let old = extractor.extract_palette(receive(rx_old));
        let new = extractor.extract_palette(receive(rx_new));

        tx_old.send(solid([200, 0, 0])).unwrap();
        assert_eq!(old.await.unwrap(), ExtractOutcome::Superseded);
        assert_eq!(extractor.current_palette().unwrap(), Palette::default_scheme());

        tx_new.send(solid([0, 0, 200])).unwrap();
        assert!(matches!(new.await.unwrap(), ExtractOutcome::Applied(_)));
    }

    #[tokio::test]
    async fn decode_failure_keeps_previous_palette() {
        let extractor = PaletteExtractor::default();
        let err = extractor
            .extract_palette(async { Err(LyricCanvasError::msg("404 cover.jpg")) })
            .await
            .unwrap_err();

        assert!(matches!(err, LyricCanvasError::Decode(_)));
        assert_eq!(extractor.current_palette().unwrap(), Palette::default_scheme());
    }

    #[test]
    fn tokens_increase_and_only_the_newest_is_current() {
        let extractor = PaletteExtractor::default();
        let first = extractor.begin();
        let second = extractor.begin();
        assert!(second > first);
        assert!(!extractor.is_current(first));
        assert!(extractor.is_current(second));
        assert_eq!(second.generation(), 2);
    }
}
