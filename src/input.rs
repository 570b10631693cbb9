//! Per-frame input snapshot.  The simulation never polls devices; it only
//! asks an `InputSource` whether an action is held or was pressed this frame.

use std::collections::HashSet;

use crate::geometry::Vec2;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    MoveLeft,
    MoveRight,
    MoveUp,
    MoveDown,
    Jump,
    Melee,
    Ray,
    Cone,
    Block,
    ToggleFlight,
    Dash,
}

pub trait InputSource {
    /// Action is down during this frame.
    fn held(&self, action: Action) -> bool;

    /// Action went down this frame (edge).
    fn pressed(&self, action: Action) -> bool;

    /// Raw movement axes in {-1, 0, 1}; +y is down.
    fn move_axis(&self) -> Vec2 {
        let mut axis = Vec2::ZERO;
        if self.held(Action::MoveLeft) {
            axis.x -= 1.0;
        }
        if self.held(Action::MoveRight) {
            axis.x += 1.0;
        }
        if self.held(Action::MoveUp) {
            axis.y -= 1.0;
        }
        if self.held(Action::MoveDown) {
            axis.y += 1.0;
        }
        axis
    }
}

/// Plain set-backed snapshot, built fresh by the frontend every frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct InputState {
    held: HashSet<Action>,
    pressed: HashSet<Action>,
}

impl InputState {
    /// Nothing held, nothing pressed.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_held(mut self, action: Action) -> Self {
        self.hold(action);
        self
    }

    /// A press also counts as held for the same frame.
    pub fn with_pressed(mut self, action: Action) -> Self {
        self.press(action);
        self
    }

    pub fn hold(&mut self, action: Action) {
        self.held.insert(action);
    }

    pub fn press(&mut self, action: Action) {
        self.pressed.insert(action);
        self.held.insert(action);
    }

    /// Forget this frame's edges, keep held actions.
    pub fn clear_pressed(&mut self) {
        self.pressed.clear();
    }
}

impl InputSource for InputState {
    fn held(&self, action: Action) -> bool {
        self.held.contains(&action)
    }

    fn pressed(&self, action: Action) -> bool {
        self.pressed.contains(&action)
    }
}
