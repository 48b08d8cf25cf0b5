//! The morph animator: a two-phase state machine (cooldown, morph) that
//! turns frame timestamps into per-slot visual parameters.

use std::time::{Duration, Instant};

use crate::curves;
use crate::error::{MorphError, MorphResult};
use crate::visual::{FrameVisual, Phase, SlotVisual};

/// Word cycle and timing for one animator instance.
#[derive(Debug, Clone)]
pub struct MorphConfig {
    pub words: Vec<String>,
    pub morph_duration: Duration,
    pub cooldown_time: Duration,
}

impl Default for MorphConfig {
    fn default() -> Self {
        Self {
            words: ["Be", "at", "Peace", "with", "all", "men"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            morph_duration: Duration::from_secs(1),
            cooldown_time: Duration::from_millis(250),
        }
    }
}

impl MorphConfig {
    pub fn build(self) -> MorphResult<Animator> {
        Animator::new(self)
    }
}

/// Owns the animation state. The driver calls [`Animator::tick`] once per
/// frame; everything else is derived. Instances are independent.
#[derive(Debug)]
pub struct Animator {
    words: Vec<String>,
    morph_duration: f32,
    cooldown_time: f32,

    /// Logical position in the word cycle. Monotonically increasing,
    /// never reset; wraps only through modulo at lookup.
    index: u64,
    /// Seconds into the current morph.
    morph: f32,
    /// Seconds left before the next morph starts. Driven below zero
    /// during the morph phase and folded into `morph` (see
    /// `morph_frame`).
    cooldown: f32,
    last_tick: Option<Instant>,
}

impl Animator {
    pub fn new(config: MorphConfig) -> MorphResult<Self> {
        if config.words.is_empty() {
            return Err(MorphError::EmptyWordList);
        }

        if config.morph_duration.is_zero() {
            return Err(MorphError::invalid_duration("morph duration must be non-zero"));
        }

        let cooldown_time = config.cooldown_time.as_secs_f32();

        Ok(Self {
            index: config.words.len() as u64 - 1,
            morph: 0.0,
            cooldown: cooldown_time,
            last_tick: None,
            morph_duration: config.morph_duration.as_secs_f32(),
            cooldown_time,
            words: config.words,
        })
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// Advance by wall-clock timestamp. The first tick sees a zero delta.
    pub fn tick(&mut self, now: Instant) -> FrameVisual {
        let dt = match self.last_tick.replace(now) {
            Some(prev) => now.saturating_duration_since(prev).as_secs_f32(),
            None => 0.0,
        };

        self.advance(dt)
    }

    /// Advance by an explicit delta in seconds. Core of [`Animator::tick`].
    pub fn advance(&mut self, dt: f32) -> FrameVisual {
        self.cooldown -= dt;

        let visual = if self.cooldown > 0.0 {
            self.cooldown_frame()
        } else {
            self.morph_frame()
        };

        self.morph += dt;
        visual
    }

    /// The frame shown before the first tick: the cooldown visual of the
    /// initial word pair. Pure.
    pub fn rest_visual(&self) -> FrameVisual {
        FrameVisual {
            phase: Phase::Cooldown,
            outgoing: SlotVisual {
                word: self.word_at(self.index),
                opacity_percent: 0.0,
                blur_px: 0.0,
            },
            incoming: SlotVisual {
                word: self.word_at(self.index + 1),
                opacity_percent: 100.0,
                blur_px: 0.0,
            },
        }
    }

    /// One-shot render for a reduced-motion environment: the first word,
    /// fully visible and crisp; the second slot empty. The frame loop is
    /// never started in this mode.
    pub fn static_visual(&self) -> FrameVisual {
        FrameVisual {
            phase: Phase::Cooldown,
            outgoing: SlotVisual {
                word: self.words[0].clone(),
                opacity_percent: 100.0,
                blur_px: 0.0,
            },
            incoming: SlotVisual {
                word: String::new(),
                opacity_percent: 0.0,
                blur_px: 0.0,
            },
        }
    }

    fn cooldown_frame(&mut self) -> FrameVisual {
        self.morph = 0.0;
        self.rest_visual()
    }

    fn morph_frame(&mut self) -> FrameVisual {
        // Fold the cooldown debt into the morph clock and zero it. On the
        // first morph tick this absorbs the cooldown overshoot; on every
        // later one it re-adds the delta that step one of `advance` just
        // subtracted, so the morph clock runs at twice wall time. The
        // on-screen pace of the effect depends on this fold; changing it
        // changes the animation.
        self.morph -= self.cooldown;
        self.cooldown = 0.0;

        let progress = (self.morph / self.morph_duration).min(1.0);
        let inverse = 1.0 - progress;

        let visual = FrameVisual {
            phase: Phase::Morphing,
            outgoing: SlotVisual {
                word: self.word_at(self.index),
                opacity_percent: curves::fade_opacity(inverse),
                blur_px: curves::blur_px(inverse),
            },
            incoming: SlotVisual {
                word: self.word_at(self.index + 1),
                opacity_percent: curves::fade_opacity(progress),
                blur_px: curves::blur_px(progress),
            },
        };

        if self.morph >= self.morph_duration {
            self.morph = 0.0;
            self.cooldown = self.cooldown_time;
            self.index += 1;
            tracing::debug!(index = self.index, "morph cycle complete");
        }

        visual
    }

    fn word_at(&self, index: u64) -> String {
        self.words[(index % self.words.len() as u64) as usize].clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curves::fade_opacity;

    fn three_words() -> Animator {
        MorphConfig {
            words: vec!["Be".into(), "at".into(), "Peace".into()],
            morph_duration: Duration::from_secs(1),
            cooldown_time: Duration::from_millis(250),
        }
        .build()
        .unwrap()
    }

    fn pair(visual: &FrameVisual) -> (String, String) {
        (visual.outgoing.word.clone(), visual.incoming.word.clone())
    }

    #[test]
    fn empty_word_list_is_rejected() {
        let result = MorphConfig {
            words: vec![],
            ..MorphConfig::default()
        }
        .build();

        assert!(matches!(result, Err(MorphError::EmptyWordList)));
    }

    #[test]
    fn zero_morph_duration_is_rejected() {
        let result = MorphConfig {
            morph_duration: Duration::ZERO,
            ..MorphConfig::default()
        }
        .build();

        assert!(matches!(result, Err(MorphError::InvalidDuration(_))));
    }

    #[test]
    fn initial_pair_wraps_from_last_word() {
        let animator = three_words();
        let visual = animator.rest_visual();

        assert_eq!(pair(&visual), ("Peace".to_string(), "Be".to_string()));
        assert_eq!(visual.incoming.opacity_percent, 100.0);
        assert_eq!(visual.outgoing.opacity_percent, 0.0);
        assert_eq!(visual.incoming.blur_px, 0.0);
    }

    #[test]
    fn cooldown_counts_down_across_ticks() {
        let mut animator = three_words();

        let first = animator.advance(0.1);
        assert_eq!(first.phase, Phase::Cooldown);
        assert!((animator.cooldown - 0.15).abs() < 1e-6);

        let second = animator.advance(0.1);
        assert_eq!(second.phase, Phase::Cooldown);
        assert!((animator.cooldown - 0.05).abs() < 1e-6);
    }

    #[test]
    fn cooldown_rendering_is_idempotent() {
        let mut animator = three_words();
        animator.advance(0.1);

        let a = animator.advance(0.0);
        let b = animator.advance(0.0);

        assert_eq!(a, b);
        assert_eq!(a, animator.rest_visual());
    }

    #[test]
    fn overshoot_folds_into_first_morph_frame() {
        let mut animator = three_words();

        // 0.05 s past the 0.25 s cooldown: the first morph frame starts
        // at progress 0.05, not 0.
        let visual = animator.advance(0.3);

        assert_eq!(visual.phase, Phase::Morphing);
        assert!((visual.incoming.opacity_percent - fade_opacity(0.05)).abs() < 1e-3);
        assert!((animator.morph - 0.35).abs() < 1e-6);
    }

    #[test]
    fn morph_clock_runs_at_double_rate() {
        let mut animator = three_words();
        animator.advance(0.3);

        // Each further 0.1 s tick advances progress by 0.2: the fold
        // re-adds the delta on top of the trailing accumulation.
        let visual = animator.advance(0.1);
        assert!((visual.incoming.opacity_percent - fade_opacity(0.45)).abs() < 1e-3);

        let visual = animator.advance(0.1);
        assert!((visual.incoming.opacity_percent - fade_opacity(0.65)).abs() < 1e-3);
    }

    #[test]
    fn completed_cycle_advances_index_by_one() {
        let mut animator = three_words();
        let mut saw_morph = false;

        for _ in 0..1000 {
            let visual = animator.advance(0.05);

            match visual.phase {
                Phase::Morphing => saw_morph = true,
                Phase::Cooldown if saw_morph => {
                    assert_eq!(animator.index, 3);
                    assert_eq!(pair(&visual), ("Be".to_string(), "at".to_string()));
                    return;
                }
                Phase::Cooldown => {}
            }
        }

        panic!("cycle never completed");
    }

    #[test]
    fn completion_tick_still_shows_old_pair_at_full_progress() {
        let mut animator = three_words();
        let mut last_morph_visual = None;

        loop {
            let visual = animator.advance(0.05);

            match visual.phase {
                Phase::Morphing => last_morph_visual = Some(visual),
                Phase::Cooldown if last_morph_visual.is_some() => break,
                Phase::Cooldown => {}
            }
        }

        let visual = last_morph_visual.unwrap();
        assert_eq!(pair(&visual), ("Peace".to_string(), "Be".to_string()));
        assert!((visual.incoming.opacity_percent - 100.0).abs() < 1e-3);
        assert!((visual.outgoing.opacity_percent - 0.0).abs() < 1e-3);
    }

    #[test]
    fn word_cycle_has_period_of_word_count() {
        let mut animator = three_words();
        let mut cooldown_pairs = Vec::new();
        let mut in_morph = false;

        for _ in 0..10_000 {
            let visual = animator.advance(0.05);

            match visual.phase {
                Phase::Morphing => in_morph = true,
                Phase::Cooldown => {
                    if in_morph {
                        cooldown_pairs.push(pair(&visual));
                        in_morph = false;
                    }

                    if cooldown_pairs.len() == 4 {
                        break;
                    }
                }
            }
        }

        assert_eq!(cooldown_pairs.len(), 4);
        assert_eq!(cooldown_pairs[0], ("Be".to_string(), "at".to_string()));
        assert_eq!(cooldown_pairs[1], ("at".to_string(), "Peace".to_string()));
        assert_eq!(cooldown_pairs[2], ("Peace".to_string(), "Be".to_string()));
        // Full period: back to the first post-start pair.
        assert_eq!(cooldown_pairs[3], cooldown_pairs[0]);
    }

    #[test]
    fn exactly_one_phase_per_tick() {
        let mut animator = three_words();

        for _ in 0..500 {
            let visual = animator.advance(0.016);

            match visual.phase {
                Phase::Cooldown => {
                    assert_eq!(visual.incoming.opacity_percent, 100.0);
                    assert_eq!(visual.outgoing.opacity_percent, 0.0);
                    assert_eq!(visual.incoming.blur_px, 0.0);
                    assert_eq!(visual.outgoing.blur_px, 0.0);
                }
                Phase::Morphing => {
                    let sum = visual.incoming.opacity_percent + visual.outgoing.opacity_percent;
                    assert!(sum > 0.0);
                    assert!(visual.incoming.blur_px.is_finite());
                    assert!(visual.outgoing.blur_px.is_finite());
                }
            }
        }
    }

    #[test]
    fn word_identity_is_stable_mid_morph() {
        let mut animator = three_words();
        let mut morph_pairs = Vec::new();

        for _ in 0..1000 {
            let visual = animator.advance(0.05);

            match visual.phase {
                Phase::Morphing => morph_pairs.push(pair(&visual)),
                Phase::Cooldown if !morph_pairs.is_empty() => break,
                Phase::Cooldown => {}
            }
        }

        assert!(morph_pairs.len() > 1);
        assert!(morph_pairs.iter().all(|p| p == &morph_pairs[0]));
    }

    #[test]
    fn first_timestamp_tick_has_zero_delta() {
        let mut animator = three_words();
        let t0 = Instant::now();

        let visual = animator.tick(t0);
        assert_eq!(visual.phase, Phase::Cooldown);
        assert!((animator.cooldown - 0.25).abs() < 1e-6);

        animator.tick(t0 + Duration::from_millis(100));
        assert!((animator.cooldown - 0.15).abs() < 1e-6);
    }

    #[test]
    fn static_visual_shows_first_word_only() {
        let animator = three_words();
        let visual = animator.static_visual();

        assert_eq!(visual.outgoing.word, "Be");
        assert_eq!(visual.outgoing.opacity_percent, 100.0);
        assert_eq!(visual.outgoing.blur_px, 0.0);
        assert_eq!(visual.incoming.word, "");
        assert_eq!(visual.incoming.opacity_percent, 0.0);
    }

    #[test]
    fn instances_are_independent() {
        let mut a = three_words();
        let mut b = three_words();

        a.advance(0.1);
        a.advance(0.1);
        b.advance(0.05);

        assert!((a.cooldown - 0.05).abs() < 1e-6);
        assert!((b.cooldown - 0.2).abs() < 1e-6);
    }
}
