use crate::constants::{Color, Halves, Location, MAX_TURNS, MotionType, RotationDirection, Turns};
use crate::pictograph::data::MotionAttributes;

#[derive(Debug, Clone, PartialEq)]
pub struct MotionState {
    pub color: Color,
    pub motion_type: Option<MotionType>,
    pub turns: Option<Turns>,
    pub start_loc: Option<Location>,
    pub end_loc: Option<Location>,
    pub prop_rot_dir: Option<RotationDirection>,
    pub prefloat_motion_type: Option<MotionType>,
    pub prefloat_prop_rot_dir: Option<RotationDirection>,
}

impl MotionState {
    pub fn new(color: Color) -> Self {
        Self {
            color,
            motion_type: None,
            turns: None,
            start_loc: None,
            end_loc: None,
            prop_rot_dir: None,
            prefloat_motion_type: None,
            prefloat_prop_rot_dir: None,
        }
    }

    pub fn is_shift(&self) -> bool {
        self.motion_type.is_some_and(|m| m.is_shift())
    }

    pub fn update_motion_state(&mut self, patch: &MotionAttributes) {
        if let Some(motion_type) = patch.motion_type {
            self.motion_type = Some(motion_type);
        }
        if let Some(turns) = patch.turns {
            self.turns = Some(turns);
        }
        if let Some(start_loc) = patch.start_loc {
            self.start_loc = Some(start_loc);
        }
        if let Some(end_loc) = patch.end_loc {
            self.end_loc = Some(end_loc);
        }
        if let Some(prop_rot_dir) = patch.prop_rot_dir {
            self.prop_rot_dir = Some(prop_rot_dir);
        }

        // prefloat only exists on shifts
        if self.is_shift() {
            if let Some(prefloat) = patch.prefloat_motion_type {
                self.prefloat_motion_type = Some(prefloat);
            }
            if let Some(prefloat) = patch.prefloat_prop_rot_dir {
                self.prefloat_prop_rot_dir = Some(prefloat);
            }
        } else {
            self.clear_prefloat();
        }

        if patch.prop_rot_dir.is_some() && !self.turns.is_some_and(|t| t.is_float()) {
            self.prefloat_prop_rot_dir = None;
        }
    }

    fn clear_prefloat(&mut self) {
        self.prefloat_motion_type = None;
        self.prefloat_prop_rot_dir = None;
    }

    pub fn to_attributes(&self) -> MotionAttributes {
        MotionAttributes {
            motion_type: self.motion_type,
            turns: self.turns,
            start_loc: self.start_loc,
            end_loc: self.end_loc,
            prop_rot_dir: self.prop_rot_dir,
            prefloat_motion_type: self.prefloat_motion_type,
            prefloat_prop_rot_dir: self.prefloat_prop_rot_dir,
            ..Default::default()
        }
    }

    /// Direction the hand travels from start to end.
    pub fn handpath_direction(&self) -> Option<RotationDirection> {
        let (start, end) = (self.start_loc?, self.end_loc?);
        if start.rotated_cw() == end {
            Some(RotationDirection::Clockwise)
        } else if start.rotated_ccw() == end {
            Some(RotationDirection::CounterClockwise)
        } else {
            Some(RotationDirection::NoRotation)
        }
    }

    pub fn is_static_like(&self) -> bool {
        matches!(self.motion_type, Some(MotionType::Static | MotionType::Dash))
    }

    /// Steps turns by `delta` halves. Dropping below zero turns a pro or anti
    /// motion into a float, raising a float restores the stored prefloat.
    pub fn adjust_turns(&mut self, delta: i16) {
        match self.turns.unwrap_or_default() {
            Turns::Float => {
                if delta > 0 {
                    self.motion_type = self.prefloat_motion_type.or(Some(MotionType::Pro));
                    self.prop_rot_dir = self
                        .prefloat_prop_rot_dir
                        .or(self.handpath_direction())
                        .or(Some(RotationDirection::Clockwise));
                    self.turns = Some(Turns::ZERO);
                    self.clear_prefloat();
                }
            }
            Turns::Count(Halves(current)) => {
                let next = current as i16 + delta;
                if next < 0 {
                    if matches!(self.motion_type, Some(MotionType::Pro | MotionType::Anti)) {
                        self.prefloat_motion_type = self.motion_type;
                        self.prefloat_prop_rot_dir = self.prop_rot_dir;
                        self.motion_type = Some(MotionType::Float);
                        self.prop_rot_dir = Some(RotationDirection::NoRotation);
                        self.turns = Some(Turns::Float);
                    } else {
                        self.turns = Some(Turns::ZERO);
                    }
                    return;
                }

                let next = Halves((next as u16).min(MAX_TURNS.0));
                self.turns = Some(Turns::Count(next));
                if self.is_static_like() {
                    if next.0 == 0 {
                        self.prop_rot_dir = Some(RotationDirection::NoRotation);
                    } else if self.prop_rot_dir.is_none_or(|r| r == RotationDirection::NoRotation)
                    {
                        self.prop_rot_dir = Some(RotationDirection::Clockwise);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pro_state() -> MotionState {
        let mut state = MotionState::new(Color::Blue);
        state.update_motion_state(&MotionAttributes {
            motion_type: Some(MotionType::Pro),
            turns: Some(Turns::ZERO),
            start_loc: Some(Location::North),
            end_loc: Some(Location::East),
            prop_rot_dir: Some(RotationDirection::Clockwise),
            ..Default::default()
        });
        state
    }

    #[test]
    fn test_partial_update_preserves_other_keys() {
        let mut state = pro_state();
        let before = state.clone();
        state.update_motion_state(&MotionAttributes {
            end_loc: Some(Location::West),
            ..Default::default()
        });

        assert_eq!(state.end_loc, Some(Location::West));
        assert_eq!(
            MotionState {
                end_loc: before.end_loc,
                ..state.clone()
            },
            before
        );
    }

    #[test]
    fn test_each_key_updates_alone() {
        let base = pro_state();
        let cases = [
            (
                MotionAttributes {
                    motion_type: Some(MotionType::Anti),
                    ..Default::default()
                },
                MotionState {
                    motion_type: Some(MotionType::Anti),
                    ..base.clone()
                },
            ),
            (
                MotionAttributes {
                    turns: Some(Turns::Count(Halves(4))),
                    ..Default::default()
                },
                MotionState {
                    turns: Some(Turns::Count(Halves(4))),
                    ..base.clone()
                },
            ),
            (
                MotionAttributes {
                    start_loc: Some(Location::South),
                    ..Default::default()
                },
                MotionState {
                    start_loc: Some(Location::South),
                    ..base.clone()
                },
            ),
            (
                MotionAttributes {
                    end_loc: Some(Location::West),
                    ..Default::default()
                },
                MotionState {
                    end_loc: Some(Location::West),
                    ..base.clone()
                },
            ),
            (
                MotionAttributes {
                    prop_rot_dir: Some(RotationDirection::CounterClockwise),
                    ..Default::default()
                },
                MotionState {
                    prop_rot_dir: Some(RotationDirection::CounterClockwise),
                    ..base.clone()
                },
            ),
            (
                MotionAttributes {
                    prefloat_motion_type: Some(MotionType::Anti),
                    ..Default::default()
                },
                MotionState {
                    prefloat_motion_type: Some(MotionType::Anti),
                    ..base.clone()
                },
            ),
            (
                MotionAttributes {
                    prefloat_prop_rot_dir: Some(RotationDirection::CounterClockwise),
                    ..Default::default()
                },
                MotionState {
                    prefloat_prop_rot_dir: Some(RotationDirection::CounterClockwise),
                    ..base.clone()
                },
            ),
        ];

        for (patch, expected) in cases {
            let mut state = base.clone();
            state.update_motion_state(&patch);
            assert_eq!(state, expected, "patch {patch:?}");
        }
    }

    #[test]
    fn test_prefloat_gate_rejects_non_shift() {
        for motion_type in [MotionType::Dash, MotionType::Static] {
            let mut state = MotionState::new(Color::Red);
            state.update_motion_state(&MotionAttributes {
                motion_type: Some(motion_type),
                ..Default::default()
            });
            state.update_motion_state(&MotionAttributes {
                prefloat_motion_type: Some(MotionType::Anti),
                prefloat_prop_rot_dir: Some(RotationDirection::CounterClockwise),
                ..Default::default()
            });
            assert_eq!(state.prefloat_motion_type, None);
            assert_eq!(state.prefloat_prop_rot_dir, None);
        }
    }

    #[test]
    fn test_prefloat_accepted_on_shift() {
        let mut state = pro_state();
        state.update_motion_state(&MotionAttributes {
            prefloat_motion_type: Some(MotionType::Anti),
            prefloat_prop_rot_dir: Some(RotationDirection::CounterClockwise),
            ..Default::default()
        });
        assert_eq!(state.prefloat_motion_type, Some(MotionType::Anti));
        assert_eq!(
            state.prefloat_prop_rot_dir,
            Some(RotationDirection::CounterClockwise)
        );
    }

    #[test]
    fn test_setting_rotation_clears_prefloat_rotation() {
        let mut state = pro_state();
        state.prefloat_prop_rot_dir = Some(RotationDirection::CounterClockwise);
        state.update_motion_state(&MotionAttributes {
            prop_rot_dir: Some(RotationDirection::Clockwise),
            ..Default::default()
        });
        assert_eq!(state.prefloat_prop_rot_dir, None);
    }

    #[test]
    fn test_rotation_in_same_patch_still_clears_prefloat_rotation() {
        let mut state = pro_state();
        state.update_motion_state(&MotionAttributes {
            prop_rot_dir: Some(RotationDirection::Clockwise),
            prefloat_prop_rot_dir: Some(RotationDirection::CounterClockwise),
            turns: Some(Turns::Count(Halves(2))),
            ..Default::default()
        });
        assert_eq!(state.prefloat_prop_rot_dir, None);
    }

    #[test]
    fn test_rotation_without_turns_clears_prefloat_rotation() {
        let mut state = MotionState::new(Color::Red);
        state.motion_type = Some(MotionType::Anti);
        state.prefloat_prop_rot_dir = Some(RotationDirection::CounterClockwise);
        state.update_motion_state(&MotionAttributes {
            prop_rot_dir: Some(RotationDirection::Clockwise),
            ..Default::default()
        });
        assert_eq!(state.turns, None);
        assert_eq!(state.prefloat_prop_rot_dir, None);
    }

    #[test]
    fn test_float_keeps_prefloat_rotation() {
        let mut state = pro_state();
        state.update_motion_state(&MotionAttributes {
            motion_type: Some(MotionType::Float),
            turns: Some(Turns::Float),
            prefloat_prop_rot_dir: Some(RotationDirection::Clockwise),
            ..Default::default()
        });
        state.update_motion_state(&MotionAttributes {
            prop_rot_dir: Some(RotationDirection::NoRotation),
            ..Default::default()
        });
        assert_eq!(state.prefloat_prop_rot_dir, Some(RotationDirection::Clockwise));
    }

    #[test]
    fn test_leaving_shift_clears_prefloat() {
        let mut state = pro_state();
        state.prefloat_motion_type = Some(MotionType::Anti);
        state.update_motion_state(&MotionAttributes {
            motion_type: Some(MotionType::Dash),
            ..Default::default()
        });
        assert!(state.prefloat_motion_type.is_none());
    }

    #[test]
    fn test_adjust_turns_converts_to_float_and_back() {
        let mut state = pro_state();
        state.adjust_turns(-1);
        assert_eq!(state.motion_type, Some(MotionType::Float));
        assert_eq!(state.turns, Some(Turns::Float));
        assert_eq!(state.prefloat_motion_type, Some(MotionType::Pro));
        assert_eq!(state.prefloat_prop_rot_dir, Some(RotationDirection::Clockwise));

        state.adjust_turns(1);
        assert_eq!(state.motion_type, Some(MotionType::Pro));
        assert_eq!(state.prop_rot_dir, Some(RotationDirection::Clockwise));
        assert_eq!(state.turns, Some(Turns::ZERO));
        assert!(state.prefloat_motion_type.is_none());
    }

    #[test]
    fn test_adjust_turns_on_static() {
        let mut state = MotionState::new(Color::Red);
        state.update_motion_state(&MotionAttributes {
            motion_type: Some(MotionType::Static),
            turns: Some(Turns::ZERO),
            prop_rot_dir: Some(RotationDirection::NoRotation),
            ..Default::default()
        });
        state.adjust_turns(2);
        assert_eq!(state.turns, Some(Turns::Count(Halves(2))));
        assert_eq!(state.prop_rot_dir, Some(RotationDirection::Clockwise));
        state.adjust_turns(-2);
        assert_eq!(state.prop_rot_dir, Some(RotationDirection::NoRotation));
        state.adjust_turns(-1);
        assert_eq!(state.turns, Some(Turns::ZERO));
        state.adjust_turns(20);
        assert_eq!(state.turns, Some(Turns::Count(MAX_TURNS)));
    }

    #[test]
    fn test_handpath_direction() {
        let state = pro_state();
        assert_eq!(state.handpath_direction(), Some(RotationDirection::Clockwise));
    }
}
