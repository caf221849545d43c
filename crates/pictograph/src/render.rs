use crate::constants::{Color, MotionType, PropType, Turns};
use palette::Srgb;

pub fn hand_color(color: Color) -> Srgb<u8> {
    match color {
        Color::Blue => Srgb::new(0x2E, 0x31, 0x92),
        Color::Red => Srgb::new(0xED, 0x1C, 0x24),
    }
}

/// Asset reference plus the fill it is drawn with.
#[derive(Debug, Clone, PartialEq)]
pub struct SvgHandle {
    pub asset: String,
    pub fill: Srgb<u8>,
}

impl SvgHandle {
    pub fn arrow(motion_type: MotionType, turns: Turns, color: Color) -> Self {
        let asset = match (motion_type, turns) {
            (MotionType::Float, _) | (_, Turns::Float) => "arrows/float.svg".to_string(),
            (motion_type, Turns::Count(h)) => {
                let radial = if motion_type.is_shift() {
                    "from_radial"
                } else {
                    "static_like"
                };
                format!(
                    "arrows/{motion_type}/{radial}/{motion_type}_{:.1}.svg",
                    h.as_f64()
                )
            }
        };
        Self {
            asset,
            fill: hand_color(color),
        }
    }

    pub fn prop(prop_type: PropType, color: Color) -> Self {
        Self {
            asset: format!("props/{prop_type}.svg"),
            fill: hand_color(color),
        }
    }

    pub fn fill_hex(&self) -> String {
        format!("#{:X}", self.fill)
    }

    /// Rewrites every `fill="..."` attribute, except `fill="none"`, to this
    /// handle's colour.
    pub fn colorize(&self, svg: &str) -> String {
        const ATTR: &str = "fill=\"";
        let hex = self.fill_hex();
        let mut out = String::with_capacity(svg.len());
        let mut rest = svg;

        while let Some(start) = rest.find(ATTR) {
            let value_start = start + ATTR.len();
            out.push_str(&rest[..value_start]);
            let tail = &rest[value_start..];
            let Some(end) = tail.find('"') else {
                rest = tail;
                break;
            };
            let value = &tail[..end];
            out.push_str(if value == "none" { value } else { &hex });
            rest = &tail[end..];
        }
        out.push_str(rest);
        out
    }
}
