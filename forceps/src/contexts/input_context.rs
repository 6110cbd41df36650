use crate::TriggerMode;

/// What the activate control asks a tool to do this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntentEdge {
    /// Close the tool
    Activate,
    /// Open the tool and let go of anything held
    Deactivate,
}

#[derive(Debug, Default)]
/// Context that holds the state of the tool's activate control. Hosts feed the raw button state in
/// once per frame with [`InputContext::update`]; tools read the resulting edges.
pub struct InputContext {
    activate_button: bool,
    activate_button_prev: bool,
}

impl InputContext {
    /// Record this frame's state of the activate control.
    pub fn update(&mut self, activate_pressed: bool) {
        self.activate_button_prev = self.activate_button;
        self.activate_button = activate_pressed;
    }

    pub fn activate_button(&self) -> bool {
        self.activate_button
    }

    pub fn activate_button_just_pressed(&self) -> bool {
        self.activate_button && !self.activate_button_prev
    }

    pub fn activate_button_just_released(&self) -> bool {
        !self.activate_button && self.activate_button_prev
    }

    /// The edge, if any, that a tool bound with `trigger_mode` should react to this frame.
    pub fn intent_edge(&self, trigger_mode: TriggerMode) -> Option<IntentEdge> {
        let (on_press, on_release) = match trigger_mode {
            TriggerMode::PressToClose => (IntentEdge::Activate, IntentEdge::Deactivate),
            TriggerMode::ReleaseToClose => (IntentEdge::Deactivate, IntentEdge::Activate),
        };

        if self.activate_button_just_pressed() {
            Some(on_press)
        } else if self.activate_button_just_released() {
            Some(on_release)
        } else {
            None
        }
    }
}
