use std::collections::HashMap;

use crate::foundation::{
    core::STATIC_FRAME_DURATION_MS,
    error::{PixooError, PixooResult},
};

/// How a source sequence is downsampled to fit the device's frame cap.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AnimationPlan {
    /// Frames that will be sent, `ceil(source / stride)`. Always below the cap.
    pub frame_count: u32,
    /// Source-frame step between kept frames, `>= 1`.
    pub frame_stride: u32,
    /// Representative display time of one *source* frame.
    pub frame_duration_ms: u32,
}

/// Pick the smallest stride `d` with `ceil(total / d) < max_output_frames`.
///
/// The duration starts at the static-image default; call
/// [`AnimationPlan::with_observed_durations`] once decoder timings are known.
pub fn plan(total_source_frames: u32, max_output_frames: u32) -> PixooResult<AnimationPlan> {
    if total_source_frames == 0 {
        return Err(PixooError::validation(
            "cannot plan an animation with zero source frames",
        ));
    }
    if max_output_frames < 2 {
        return Err(PixooError::validation(format!(
            "frame cap must be at least 2, got {max_output_frames}"
        )));
    }

    // ceil(t / d) <= m  <=>  d >= t / m, with m the largest allowed count.
    let allowed = max_output_frames - 1;
    let frame_stride = total_source_frames.div_ceil(allowed);
    let frame_count = total_source_frames.div_ceil(frame_stride);

    tracing::debug!(
        total_source_frames,
        frame_stride,
        frame_count,
        "planned animation sampling"
    );

    Ok(AnimationPlan {
        frame_count,
        frame_stride,
        frame_duration_ms: STATIC_FRAME_DURATION_MS,
    })
}

impl AnimationPlan {
    /// Adopt the representative duration of the frames actually sampled.
    ///
    /// An empty slice (no timing metadata at all) keeps the current value.
    pub fn with_observed_durations(mut self, sampled_durations_ms: &[u32]) -> Self {
        if let Some(ms) = representative_duration_ms(sampled_durations_ms) {
            self.frame_duration_ms = ms;
        }
        self
    }

    /// Dwell time sent to the device per kept frame. Skipped frames' time is
    /// folded into the frame that represents them.
    pub fn step_duration_ms(&self) -> u32 {
        self.frame_duration_ms.saturating_mul(self.frame_stride)
    }

    /// A single frame: sent as a still with the static dwell time.
    pub fn is_static(&self) -> bool {
        self.frame_count == 1
    }

    /// Source indices that will be kept, in send order.
    pub fn sampled_indices(&self, total_source_frames: usize) -> impl Iterator<Item = usize> {
        (0..total_source_frames)
            .step_by(self.frame_stride.max(1) as usize)
            .take(self.frame_count as usize)
    }
}

/// Statistical mode of the observed durations; ties and all-distinct inputs
/// fall back to the first observation.
pub fn representative_duration_ms(durations_ms: &[u32]) -> Option<u32> {
    let first = *durations_ms.first()?;

    let mut counts: HashMap<u32, usize> = HashMap::new();
    for &d in durations_ms {
        *counts.entry(d).or_default() += 1;
    }

    let best = counts.values().copied().max().unwrap_or(0);
    let mut modes = counts
        .iter()
        .filter(|&(_, &count)| count == best)
        .map(|(&d, _)| d);

    match (modes.next(), modes.next()) {
        (Some(d), None) if best > 1 => Some(d),
        _ => Some(first),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/sampler.rs"]
mod tests;
