use std::path::Path;

use image::RgbImage;

use crate::{
    animation::sampler::{self, AnimationPlan},
    codec::buffer::{encode, to_buffer},
    device::{session::DeviceSession, transport::Transport},
    foundation::{
        core::{AnimationId, MAX_ANIMATION_FRAMES, MatrixSize, Rgb8},
        error::{PixooError, PixooResult},
    },
    frame::{
        fit::fit,
        source::{DecodedFrames, FrameSource},
    },
    hub::album::HubClient,
    qr::render::{QrStyle, render},
};

/// Outcome of one streamed animation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StreamReport {
    /// Id the frames were sent under.
    pub identity: AnimationId,
    /// Sampling plan the frames followed.
    pub plan: AnimationPlan,
    /// Frames actually delivered; below `plan.count` when the source ended early.
    pub frames_sent: u32,
}

impl<T: Transport> DeviceSession<T> {
    /// Fit, encode and stream every sampled frame of `source` to the device.
    ///
    /// One identity is requested up front and shared by all frames; frames go
    /// out strictly in order with ordinals `0..frame_count`. A transport
    /// failure aborts the stream. Frames already sent stay buffered on the
    /// device.
    #[tracing::instrument(skip(self, source))]
    pub fn send_animation(&mut self, source: &mut dyn FrameSource) -> PixooResult<StreamReport> {
        let total = source.frame_count();
        let total_frames = u32::try_from(total)
            .map_err(|_| PixooError::validation(format!("{total} source frames is too many")))?;
        let mut plan = sampler::plan(total_frames, MAX_ANIMATION_FRAMES)?;

        if total > 1 {
            let durations: Vec<u32> = plan
                .sampled_indices(total)
                .filter_map(|i| source.delay_ms(i))
                .collect();
            plan = plan.with_observed_durations(&durations);
        }
        let step_ms = plan.step_duration_ms();

        let identity = self.get_animation_identity()?;
        tracing::info!(
            id = identity.0,
            source_frames = total,
            frames = plan.frame_count,
            stride = plan.frame_stride,
            step_ms,
            "streaming animation"
        );

        let mut ordinal = 0u32;
        let mut cursor = 0usize;
        while let Some(frame) = source.frame_at(cursor)? {
            if ordinal >= plan.frame_count {
                tracing::warn!(cursor, "source yielded more frames than planned; stopping");
                break;
            }
            let fitted = fit(&frame.image, self.size(), self.fill());
            let encoded = encode(&to_buffer(&fitted)?);
            self.send_frame(&plan, ordinal, identity, step_ms, &encoded)?;

            ordinal += 1;
            cursor += plan.frame_stride as usize;
        }

        if ordinal < plan.frame_count {
            tracing::warn!(
                sent = ordinal,
                planned = plan.frame_count,
                "source ended early; the device will wait for the missing frames"
            );
        }
        Ok(StreamReport {
            identity,
            plan,
            frames_sent: ordinal,
        })
    }

    /// Decode `bytes` (any supported still format or GIF) and stream it.
    pub fn send_image_bytes(&mut self, bytes: &[u8]) -> PixooResult<StreamReport> {
        let mut frames = DecodedFrames::decode(bytes)?;
        self.send_animation(&mut frames)
    }

    /// Decode a still or GIF from disk and stream it.
    pub fn send_image_path(&mut self, path: impl AsRef<Path>) -> PixooResult<StreamReport> {
        let mut frames = DecodedFrames::open(path)?;
        self.send_animation(&mut frames)
    }

    /// Download through the session's transport, then stream.
    pub fn send_image_url(&mut self, url: &str) -> PixooResult<StreamReport> {
        let mut frames = DecodedFrames::fetch(self.transport_mut(), url)?;
        self.send_animation(&mut frames)
    }

    /// Render `payload` as a QR code and show it as a still image.
    ///
    /// The bitmap is already matrix-sized, so it skips the fitter.
    pub fn send_qr(&mut self, payload: &str, style: QrStyle) -> PixooResult<Option<AnimationId>> {
        let bitmap = render(payload, self.size().side(), style)?;
        self.send_static_image(&to_buffer(&bitmap)?)
    }

    /// Show the cover of whatever the hub's media player is playing.
    ///
    /// Returns `None` without touching the device when nothing is playing.
    pub fn send_album_art(&mut self, hub: &HubClient) -> PixooResult<Option<StreamReport>> {
        let Some(url) = hub.album_cover_url(self.transport_mut())? else {
            tracing::warn!(entity = hub.entity_id(), "no album art available");
            return Ok(None);
        };
        self.send_image_url(&url).map(Some)
    }
}

/// First frame of `source`, fitted exactly as it would be sent. No device involved.
pub fn preview_frame(
    source: &mut dyn FrameSource,
    size: MatrixSize,
    fill: Rgb8,
) -> PixooResult<RgbImage> {
    let frame = source
        .frame_at(0)?
        .ok_or_else(|| PixooError::validation("source has no frames to preview"))?;
    Ok(fit(&frame.image, size, fill))
}

#[cfg(test)]
#[path = "../../tests/unit/device/stream.rs"]
mod tests;
