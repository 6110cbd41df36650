use crate::util::move_towards;

/// How far apart a tool's jaws are: 0 is the rest (closed) shape, 1 is fully open.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Openness(pub f32);

impl Openness {
    /// Where the jaws should be heading. A held object keeps them `holding_open_amount` apart.
    pub fn target(closing: bool, holding: bool, holding_open_amount: f32) -> f32 {
        match (closing, holding) {
            (false, _) => 1.,
            (true, true) => holding_open_amount,
            (true, false) => 0.,
        }
    }

    /// Move toward `target` at no more than `speed` units per second.
    pub fn step(&mut self, target: f32, speed: f32, dt: f32) -> f32 {
        self.0 = move_towards(self.0, target, speed * dt.max(0.)).clamp(0., 1.);
        self.0
    }
}
