#![forbid(unsafe_code)]

//! Transition progress for screen appear/disappear animations.
//!
//! The host's animation renderer does the interpolation. This module only
//! decides how a progress clock is attached to whatever animation the host
//! runs, and turns the renderer's start/frame/end callbacks into screen and
//! container lifecycle signals.
//!
//! # Attachment
//!
//! - [`AttachStrategy::AppendToGroup`]: used while the screen is not being
//!   removed. A supplied group gets the clock as an extra member and the
//!   emitter as an extra listener, so listeners already on the group keep
//!   working. A single animation is wrapped.
//! - [`AttachStrategy::WrapInGroup`]: used while the screen is being removed.
//!   The animation is always wrapped in a fresh group with one listener, so
//!   removal and progress complete together.
//!
//! The renderer drives an attached group through [`AnimationGroup::start`],
//! [`AnimationGroup::tick`] and [`AnimationGroup::end`]. Its clock turns
//! elapsed time into the progress the emitter forwards.
//!
//! # Invariants
//!
//! - Reported progress is always in [0.0, 1.0]
//! - Frames are only forwarded between a start and its end
//! - The end signal reaches the screen before the container
//!
//! State machine: Idle → Running → Ended (→ Running on the next start)

use std::time::Duration;

use web_time::Instant;

// ============================================================================
// Animation model
// ============================================================================

/// Tag identifying a listener installed on an animation group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerTag(pub &'static str);

/// Listener installed by [`attach_progress`].
pub const TRANSITION_LISTENER: ListenerTag = ListenerTag("transition-progress");

/// An animation the host renderer runs on a screen's view.
#[derive(Debug, Clone, PartialEq)]
pub enum Animation {
    /// A single tween.
    Single {
        /// Host-side name, for logs.
        name: &'static str,
        /// Run time.
        duration: Duration,
    },
    /// Several members run together.
    Group(AnimationGroup),
}

impl Animation {
    /// A single named tween.
    pub fn single(name: &'static str, duration: Duration) -> Self {
        Self::Single { name, duration }
    }

    /// Run time. A group runs as long as its longest member.
    pub fn duration(&self) -> Duration {
        match self {
            Self::Single { duration, .. } => *duration,
            Self::Group(group) => group.duration(),
        }
    }
}

/// Member of an [`AnimationGroup`].
#[derive(Debug, Clone, PartialEq)]
pub enum AnimationMember {
    /// A regular animation.
    Animation(Animation),
    /// Reports transition progress; has no visual effect.
    Clock(ProgressClock),
}

impl AnimationMember {
    fn duration(&self) -> Duration {
        match self {
            Self::Animation(animation) => animation.duration(),
            Self::Clock(clock) => clock.duration,
        }
    }
}

/// Animations run together, sharing listeners.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AnimationGroup {
    /// Members, in insertion order.
    pub members: Vec<AnimationMember>,
    /// Listeners notified of start and end.
    pub listeners: Vec<ListenerTag>,
}

impl AnimationGroup {
    /// Empty group.
    pub fn new() -> Self {
        Self::default()
    }

    /// Run time of the longest member.
    pub fn duration(&self) -> Duration {
        self.members
            .iter()
            .map(AnimationMember::duration)
            .max()
            .unwrap_or(Duration::ZERO)
    }

    /// Number of progress clocks in the group.
    pub fn clock_count(&self) -> usize {
        self.members
            .iter()
            .filter(|m| matches!(m, AnimationMember::Clock(_)))
            .count()
    }
}

/// Progress source running alongside an animation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressClock {
    /// Same duration as the animation it tracks.
    pub duration: Duration,
}

impl ProgressClock {
    /// Create a clock for `duration`.
    pub fn new(duration: Duration) -> Self {
        Self { duration }
    }

    /// Linear progress after `elapsed`, in [0.0, 1.0].
    ///
    /// A zero-duration clock is complete immediately.
    pub fn progress_at(&self, elapsed: Duration) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        (elapsed.as_secs_f64() / self.duration.as_secs_f64()).clamp(0.0, 1.0) as f32
    }
}

/// How the progress clock joins a supplied animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachStrategy {
    /// Join an existing group in place, wrap anything else.
    AppendToGroup,
    /// Always wrap in a fresh group.
    WrapInGroup,
}

impl AttachStrategy {
    /// Strategy for a screen that is or is not being removed.
    pub fn for_removal(is_removing: bool) -> Self {
        if is_removing {
            Self::WrapInGroup
        } else {
            Self::AppendToGroup
        }
    }
}

/// Attach a progress clock and the transition listener to `animation`.
pub fn attach_progress(animation: Animation, strategy: AttachStrategy) -> AnimationGroup {
    let clock = ProgressClock::new(animation.duration());
    match (strategy, animation) {
        (AttachStrategy::AppendToGroup, Animation::Group(mut group)) => {
            group.members.push(AnimationMember::Clock(clock));
            group.listeners.push(TRANSITION_LISTENER);
            group
        }
        (_, animation) => AnimationGroup {
            members: vec![
                AnimationMember::Animation(animation),
                AnimationMember::Clock(clock),
            ],
            listeners: vec![TRANSITION_LISTENER],
        },
    }
}

// ============================================================================
// Lifecycle signals
// ============================================================================

/// Lifecycle phase of the screen owning the animated view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LifecyclePhase {
    /// Created, not yet visible.
    #[default]
    Created,
    /// Visible, not in the foreground.
    Started,
    /// In the foreground.
    Resumed,
    /// Leaving the foreground.
    Paused,
    /// No longer visible.
    Stopped,
}

impl LifecyclePhase {
    /// Whether the screen is in the foreground.
    #[inline]
    pub fn is_resumed(self) -> bool {
        matches!(self, Self::Resumed)
    }
}

/// Screen-side receiver of transition signals.
pub trait TransitionListener {
    /// The animation started.
    fn on_transition_start(&mut self);
    /// A frame was rendered. `is_reversed` is true while the screen is not
    /// in the foreground, i.e. it is going away.
    fn on_transition_progress(&mut self, progress: f32, is_reversed: bool);
    /// The animation ended.
    fn on_transition_end(&mut self);
}

/// Container-side receiver of the end-of-transition signal.
pub trait ContainerNotifier {
    /// The screen's appear transition finished.
    fn on_view_appear_transition_end(&mut self);
}

/// Phase of the tracked transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransitionPhase {
    /// No transition has started.
    #[default]
    Idle,
    /// Between start and end.
    Running,
    /// The last transition finished.
    Ended,
}

/// Bridges renderer callbacks into transition signals.
#[derive(Debug, Clone, Default)]
pub struct TransitionProgressEmitter {
    phase: TransitionPhase,
    progress: f32,
    started_at: Option<Instant>,
}

impl TransitionProgressEmitter {
    /// Create an idle emitter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current phase.
    pub fn phase(&self) -> TransitionPhase {
        self.phase
    }

    /// Last forwarded progress.
    pub fn progress(&self) -> f32 {
        self.progress
    }

    /// Renderer started the animation.
    ///
    /// A start while already running is ignored.
    pub fn start(&mut self, listener: &mut dyn TransitionListener) {
        if self.phase == TransitionPhase::Running {
            return;
        }
        self.phase = TransitionPhase::Running;
        self.progress = 0.0;
        self.started_at = Some(Instant::now());
        tracing::debug!(target: "formsheet.transition", "transition started");
        listener.on_transition_start();
    }

    /// Renderer produced a frame.
    ///
    /// Returns `false` if the frame was dropped because no transition runs.
    pub fn frame(
        &mut self,
        progress: f32,
        lifecycle: LifecyclePhase,
        listener: &mut dyn TransitionListener,
    ) -> bool {
        if self.phase != TransitionPhase::Running {
            return false;
        }
        let progress = if progress.is_nan() {
            self.progress
        } else {
            progress.clamp(0.0, 1.0)
        };
        let is_reversed = !lifecycle.is_resumed();
        self.progress = progress;
        tracing::trace!(
            target: "formsheet.transition",
            progress,
            is_reversed,
            "transition frame"
        );
        listener.on_transition_progress(progress, is_reversed);
        true
    }

    /// Renderer ended the animation.
    ///
    /// The screen hears about it first, then the container, if the view is
    /// still attached to one. Ending twice is a no-op.
    pub fn end(
        &mut self,
        listener: &mut dyn TransitionListener,
        container: Option<&mut dyn ContainerNotifier>,
    ) {
        if self.phase != TransitionPhase::Running {
            return;
        }
        self.phase = TransitionPhase::Ended;
        let elapsed_ms = self
            .started_at
            .take()
            .map(|t| t.elapsed().as_millis() as u64)
            .unwrap_or(0);
        tracing::debug!(target: "formsheet.transition", elapsed_ms, "transition ended");
        listener.on_transition_end();
        if let Some(container) = container {
            container.on_view_appear_transition_end();
        }
    }
}

// ============================================================================
// Driving an attached group
// ============================================================================

impl AnimationGroup {
    /// First progress clock in the group.
    pub fn clock(&self) -> Option<&ProgressClock> {
        self.members.iter().find_map(|m| match m {
            AnimationMember::Clock(clock) => Some(clock),
            AnimationMember::Animation(_) => None,
        })
    }

    /// Whether [`attach_progress`] has installed its listener on this group.
    pub fn has_transition_listener(&self) -> bool {
        self.listeners.contains(&TRANSITION_LISTENER)
    }

    /// The renderer started the group.
    ///
    /// Returns `false` if no transition listener is installed.
    pub fn start(
        &self,
        emitter: &mut TransitionProgressEmitter,
        listener: &mut dyn TransitionListener,
    ) -> bool {
        if !self.has_transition_listener() {
            return false;
        }
        emitter.start(listener);
        true
    }

    /// The renderer advanced the group to `elapsed`.
    ///
    /// The clock member turns `elapsed` into progress for the emitter.
    /// Returns `false` if the group has no clock or the frame was dropped.
    pub fn tick(
        &self,
        elapsed: Duration,
        lifecycle: LifecyclePhase,
        emitter: &mut TransitionProgressEmitter,
        listener: &mut dyn TransitionListener,
    ) -> bool {
        match self.clock() {
            Some(clock) => emitter.frame(clock.progress_at(elapsed), lifecycle, listener),
            None => false,
        }
    }

    /// The renderer finished the group.
    pub fn end(
        &self,
        emitter: &mut TransitionProgressEmitter,
        listener: &mut dyn TransitionListener,
        container: Option<&mut dyn ContainerNotifier>,
    ) {
        if self.has_transition_listener() {
            emitter.end(listener, container);
        }
    }
}
