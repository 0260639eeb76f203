/// Overshoot constant shared with Bevy's `EaseFunction::BackOut`.
const BACK_C1: f32 = 1.70158;
const BACK_C3: f32 = BACK_C1 + 1.0;

/// Ease-out-back: rushes past 1.0, then settles back onto it.
/// Drives the per-frame reveal loop when the tweened reveal is not used.
pub fn ease_out_back(t: f32) -> f32 {
    let u = t - 1.0;
    1.0 + BACK_C3 * u.powi(3) + BACK_C1 * u.powi(2)
}
