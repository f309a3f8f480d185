// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Catchers: terminal nodes that validate convergence and color.
//!
//! A catcher activates when every beam it receives converges through the same
//! active relay and that relay's blend equals the catcher's target color
//! exactly. Activation is edge-triggered: hooks fire on OFF→ON and ON→OFF
//! transitions only.

use alloc::boxed::Box;
use smallvec::SmallVec;

use crate::color::Color;
use crate::types::{EmitterId, NodeId};

/// Configuration for a catcher, supplied at insertion time.
#[derive(Clone, Copy, Debug)]
pub struct CatcherConfig {
    /// The color required for activation.
    pub target: Color,
}

impl Default for CatcherConfig {
    fn default() -> Self {
        Self {
            target: Color::WHITE,
        }
    }
}

/// Side-effecting notifications fired by a catcher on activation edges.
///
/// Implemented for a pair of closures `(on_activate, on_deactivate)`:
///
/// ```rust
/// use understory_beam::ActivationHook;
///
/// let mut opened = 0;
/// let mut closed = 0;
/// {
///     let mut hook = (|| opened += 1, || closed += 1);
///     hook.on_activate();
///     hook.on_deactivate();
/// }
/// assert_eq!((opened, closed), (1, 1));
/// ```
pub trait ActivationHook {
    /// Called once when the catcher turns on.
    fn on_activate(&mut self);
    /// Called once when the catcher turns off.
    fn on_deactivate(&mut self);
}

impl<A: FnMut(), D: FnMut()> ActivationHook for (A, D) {
    fn on_activate(&mut self) {
        (self.0)();
    }

    fn on_deactivate(&mut self) {
        (self.1)();
    }
}

/// Direction of a catcher activation edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransitionKind {
    /// The catcher turned on.
    Activated,
    /// The catcher turned off.
    Deactivated,
}

/// An activation edge observed on a catcher.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Transition {
    /// The catcher that flipped.
    pub catcher: NodeId,
    /// Which way it flipped.
    pub kind: TransitionKind,
}

/// The last relay a contributor's beam passed through before arriving.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Terminal {
    /// No relay: the beam came straight from the emitter.
    Direct,
    /// The beam left this relay last.
    Relay(NodeId),
}

/// How a catcher's contributions relate to each other.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Convergence {
    /// No contributions.
    Empty,
    /// Contributions disagree about their terminal relay.
    Divergent,
    /// Every contribution arrived direct.
    Direct,
    /// Every contribution left through this relay.
    Relay(NodeId),
}

impl Convergence {
    /// Classify a sequence of terminals.
    ///
    /// One terminal always converges. Two or more converge only if each equals
    /// its predecessor; a direct beam never equals a relayed one.
    pub fn of(terminals: &[Terminal]) -> Self {
        let Some((first, rest)) = terminals.split_first() else {
            return Self::Empty;
        };
        let mut prev = first;
        for t in rest {
            if t != prev {
                return Self::Divergent;
            }
            prev = t;
        }
        match *first {
            Terminal::Direct => Self::Direct,
            Terminal::Relay(id) => Self::Relay(id),
        }
    }

    /// Whether the contributions satisfy the matching rule.
    pub fn is_matching(self) -> bool {
        !matches!(self, Self::Empty | Self::Divergent)
    }
}

/// A terminal node that compares converged beams against a target color.
pub struct Catcher {
    target: Color,
    contributors: SmallVec<[EmitterId; 4]>,
    matched: bool,
    color: Color,
    active: bool,
    hook: Option<Box<dyn ActivationHook>>,
}

impl core::fmt::Debug for Catcher {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Catcher")
            .field("target", &self.target)
            .field("contributors", &self.contributors)
            .field("matched", &self.matched)
            .field("color", &self.color)
            .field("active", &self.active)
            .field("has_hook", &self.hook.is_some())
            .finish()
    }
}

impl Catcher {
    /// Create an inactive catcher without a hook.
    pub fn new(config: CatcherConfig) -> Self {
        Self {
            target: config.target,
            contributors: SmallVec::new(),
            matched: false,
            color: Color::BLACK,
            active: false,
            hook: None,
        }
    }

    /// Install (or clear) the activation hook.
    pub fn set_hook(&mut self, hook: Option<Box<dyn ActivationHook>>) {
        self.hook = hook;
    }

    pub(crate) fn add_contributor(&mut self, emitter: EmitterId) -> bool {
        if self.contributors.contains(&emitter) {
            return false;
        }
        self.contributors.push(emitter);
        true
    }

    pub(crate) fn remove_contributor(&mut self, emitter: EmitterId) -> bool {
        let Some(pos) = self.contributors.iter().position(|e| *e == emitter) else {
            return false;
        };
        self.contributors.remove(pos);
        true
    }

    /// Emitters currently terminating here, in registration order.
    pub fn contributors(&self) -> &[EmitterId] {
        &self.contributors
    }

    /// The color required for activation.
    pub fn target(&self) -> Color {
        self.target
    }

    /// Whether the last evaluation satisfied the matching rule.
    pub fn is_matched(&self) -> bool {
        self.matched
    }

    /// The color resolved on the last evaluation, or [`Color::BLACK`] if none.
    pub fn color(&self) -> Color {
        self.color
    }

    /// Whether the catcher is on.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Apply an evaluation result.
    ///
    /// `resolved` is the color delivered through the common relay, if the
    /// contributions converge through an active one. Returns the edge this
    /// caused, if any, after firing the matching hook.
    pub(crate) fn settle(
        &mut self,
        convergence: Convergence,
        resolved: Option<Color>,
    ) -> Option<TransitionKind> {
        self.matched = convergence.is_matching();
        self.color = resolved.unwrap_or(Color::BLACK);
        if self.matched && resolved == Some(self.target) {
            self.activate()
        } else {
            self.deactivate()
        }
    }

    fn activate(&mut self) -> Option<TransitionKind> {
        if self.active {
            return None;
        }
        self.active = true;
        if let Some(hook) = self.hook.as_mut() {
            hook.on_activate();
        }
        Some(TransitionKind::Activated)
    }

    fn deactivate(&mut self) -> Option<TransitionKind> {
        if !self.active {
            return None;
        }
        self.active = false;
        if let Some(hook) = self.hook.as_mut() {
            hook.on_deactivate();
        }
        Some(TransitionKind::Deactivated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::rc::Rc;
    use core::cell::Cell;

    fn relay(i: u32) -> Terminal {
        Terminal::Relay(NodeId::new(i, 1))
    }

    fn counting_hook(on: &Rc<Cell<u32>>, off: &Rc<Cell<u32>>) -> Box<dyn ActivationHook> {
        let (on, off) = (on.clone(), off.clone());
        Box::new((move || on.set(on.get() + 1), move || off.set(off.get() + 1)))
    }

    #[test]
    fn convergence_rules() {
        assert_eq!(Convergence::of(&[]), Convergence::Empty);
        assert_eq!(
            Convergence::of(&[relay(3)]),
            Convergence::Relay(NodeId::new(3, 1))
        );
        assert_eq!(Convergence::of(&[Terminal::Direct]), Convergence::Direct);
        assert_eq!(
            Convergence::of(&[relay(1), relay(1), relay(1)]),
            Convergence::Relay(NodeId::new(1, 1))
        );
        assert_eq!(Convergence::of(&[relay(1), relay(2)]), Convergence::Divergent);
        assert_eq!(
            Convergence::of(&[relay(1), Terminal::Direct]),
            Convergence::Divergent
        );
        assert_eq!(
            Convergence::of(&[Terminal::Direct, Terminal::Direct]),
            Convergence::Direct
        );
        assert!(Convergence::Direct.is_matching());
        assert!(!Convergence::Divergent.is_matching());
        assert!(!Convergence::Empty.is_matching());
    }

    #[test]
    fn activation_is_edge_triggered() {
        let (on, off) = (Rc::new(Cell::new(0)), Rc::new(Cell::new(0)));
        let mut catcher = Catcher::new(CatcherConfig { target: Color::RED });
        catcher.set_hook(Some(counting_hook(&on, &off)));
        let through = Convergence::of(&[relay(0)]);

        assert_eq!(
            catcher.settle(through, Some(Color::RED)),
            Some(TransitionKind::Activated)
        );
        assert_eq!(catcher.settle(through, Some(Color::RED)), None);
        assert_eq!(on.get(), 1);
        assert_eq!(off.get(), 0);

        assert_eq!(
            catcher.settle(Convergence::Empty, None),
            Some(TransitionKind::Deactivated)
        );
        assert_eq!(catcher.settle(Convergence::Empty, None), None);
        assert_eq!(off.get(), 1);
    }

    #[test]
    fn color_mismatch_or_direct_never_activates() {
        let mut catcher = Catcher::new(CatcherConfig { target: Color::RED });
        assert_eq!(
            catcher.settle(Convergence::of(&[relay(0)]), Some(Color::GREEN)),
            None
        );
        assert!(catcher.is_matched());
        assert!(!catcher.is_active());

        assert_eq!(catcher.settle(Convergence::Direct, None), None);
        assert!(catcher.is_matched());
        assert!(!catcher.is_active());
        assert_eq!(catcher.color(), Color::BLACK);
    }

    #[test]
    fn divergent_never_activates_even_with_target_color() {
        let mut catcher = Catcher::new(CatcherConfig { target: Color::RED });
        assert_eq!(catcher.settle(Convergence::Divergent, Some(Color::RED)), None);
        assert!(!catcher.is_matched());
        assert!(!catcher.is_active());
    }

    #[test]
    fn contributor_registration_is_idempotent() {
        let mut catcher = Catcher::new(CatcherConfig::default());
        let e = EmitterId::new(0, 1);
        assert!(catcher.add_contributor(e));
        assert!(!catcher.add_contributor(e));
        assert_eq!(catcher.contributors(), &[e]);
        assert!(catcher.remove_contributor(e));
        assert!(!catcher.remove_contributor(e));
    }
}
