//! The two-step state machine and its transition plans.
//!
//! A transition is an asynchronous sequence of timed visual effects; the
//! actual state mutation happens only when the host reports the sequence
//! settled. While a transition is outstanding the controller is busy and
//! rejects further requests. This is the only mutual exclusion in the system,
//! guarding against re-entrant transitions from rapid double-activation.
//! There is no cancellation: a started sequence always runs to completion.

use tracing::debug;

/// The two sequential input phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Collecting and validating the primary number.
    EnteringNumber,
    /// Collecting expiry, security code, and postal code.
    EnteringMetadata,
}

/// What the step affordance icon shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Affordance {
    /// Arrow: advance to the metadata step.
    Forward,
    /// Check mark: the form is in its final step.
    Confirm,
}

/// Fade duration for show/hide effects, in milliseconds.
pub const FADE_MS: u32 = 100;
/// Pause before the number field hands off to the metadata block.
pub const HANDOFF_DELAY_MS: u32 = 500;
/// Duration of the number recolor effect.
pub const RECOLOR_MS: u32 = 300;

/// One timed visual effect within a transition sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Hide the number placeholder overlay.
    FadeOutPlaceholder {
        /// Effect duration in milliseconds.
        ms: u32,
    },
    /// Hide the metadata block.
    FadeOutMetadata {
        /// Effect duration in milliseconds.
        ms: u32,
    },
    /// Remove any truncated last-four display.
    FadeOutLastFour {
        /// Effect duration in milliseconds.
        ms: u32,
    },
    /// Pause between effects.
    Delay {
        /// Pause duration in milliseconds.
        ms: u32,
    },
    /// Recolor the number field for the hand-off.
    RecolorNumber {
        /// Effect duration in milliseconds.
        ms: u32,
    },
    /// Reveal the truncated last-four display.
    RevealLastFour {
        /// Effect duration in milliseconds.
        ms: u32,
    },
    /// Reveal the metadata block.
    RevealMetadata {
        /// Effect duration in milliseconds.
        ms: u32,
    },
    /// Reveal the number placeholder overlay.
    RevealPlaceholder {
        /// Effect duration in milliseconds.
        ms: u32,
    },
}

/// An ordered sequence of timed effects for one transition.
///
/// The host plays the effects in order and calls the controller's
/// completion hook once every effect has settled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionPlan {
    /// State the transition leaves.
    pub from: Step,
    /// State the transition enters.
    pub to: Step,
    /// Visual effects, in play order.
    pub effects: Vec<Effect>,
}

impl TransitionPlan {
    fn forward() -> Self {
        Self {
            from: Step::EnteringNumber,
            to: Step::EnteringMetadata,
            effects: vec![
                Effect::FadeOutPlaceholder { ms: FADE_MS },
                Effect::FadeOutMetadata { ms: FADE_MS },
                Effect::Delay { ms: HANDOFF_DELAY_MS },
                Effect::FadeOutLastFour { ms: FADE_MS },
                Effect::RecolorNumber { ms: RECOLOR_MS },
                Effect::RevealLastFour { ms: FADE_MS },
                Effect::RevealMetadata { ms: FADE_MS },
            ],
        }
    }

    fn backward() -> Self {
        Self {
            from: Step::EnteringMetadata,
            to: Step::EnteringNumber,
            effects: vec![
                Effect::FadeOutPlaceholder { ms: FADE_MS },
                Effect::FadeOutMetadata { ms: FADE_MS },
                Effect::FadeOutLastFour { ms: FADE_MS },
                Effect::RecolorNumber { ms: RECOLOR_MS },
                Effect::RevealPlaceholder { ms: FADE_MS },
            ],
        }
    }
}

/// Owns the step state, the busy flag, and the hold flag.
#[derive(Debug, Clone, Default)]
pub struct StepController {
    step: Step,
    busy: bool,
    hold: bool,
    pending: Option<Step>,
}

impl Default for Step {
    fn default() -> Self {
        Step::EnteringNumber
    }
}

impl StepController {
    /// Fresh controller in [`Step::EnteringNumber`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Current step.
    #[inline]
    pub fn step(&self) -> Step {
        self.step
    }

    /// True while a transition sequence is outstanding.
    #[inline]
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// True when automatic forward progression is suppressed because the
    /// user manually returned to the number step.
    #[inline]
    pub fn is_held(&self) -> bool {
        self.hold
    }

    /// Requests a transition to `to`.
    ///
    /// Returns the effect plan to play, or `None` when the request is not
    /// performed: another transition is in flight, or `to` is already the
    /// current step.
    pub fn request(&mut self, to: Step) -> Option<TransitionPlan> {
        if self.busy {
            debug!(?to, "transition rejected: another is in flight");
            return None;
        }
        if to == self.step {
            return None;
        }
        self.busy = true;
        self.pending = Some(to);
        debug!(from = ?self.step, ?to, "transition started");
        Some(match to {
            Step::EnteringMetadata => TransitionPlan::forward(),
            Step::EnteringNumber => TransitionPlan::backward(),
        })
    }

    /// Marks the outstanding transition settled and applies the state
    /// mutation. Clears the busy flag; entering the metadata step clears
    /// the hold flag, returning to the number step sets it.
    ///
    /// Returns the step entered, or `None` when no transition was pending.
    pub fn complete(&mut self) -> Option<Step> {
        let to = self.pending.take()?;
        self.step = to;
        self.busy = false;
        self.hold = matches!(to, Step::EnteringNumber);
        debug!(step = ?to, "transition settled");
        Some(to)
    }

    /// The affordance icon matching the current step.
    pub fn affordance(&self) -> Affordance {
        match self.step {
            Step::EnteringNumber => Affordance::Forward,
            Step::EnteringMetadata => Affordance::Confirm,
        }
    }
}
