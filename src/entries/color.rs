/// RGB color with 0-255 channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Map a score onto a red -> yellow -> green gradient.
///
/// Input is clamped to [0, 100]. The lower half holds red at full and ramps
/// green up; the upper half holds green at full and ramps red down. Blue is
/// always zero.
pub fn score_to_color(score: i64) -> Rgb {
    let score = score.clamp(0, 100);

    if score <= 50 {
        let g = (score as f64 / 50.0 * 255.0).round() as u8;
        Rgb { r: 255, g, b: 0 }
    } else {
        let r = ((100 - score) as f64 / 50.0 * 255.0).round() as u8;
        Rgb { r, g: 255, b: 0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gradient_endpoints() {
        assert_eq!(score_to_color(0), Rgb { r: 255, g: 0, b: 0 });
        assert_eq!(score_to_color(50), Rgb { r: 255, g: 255, b: 0 });
        assert_eq!(score_to_color(100), Rgb { r: 0, g: 255, b: 0 });
    }

    #[test]
    fn clamps_out_of_range_input() {
        assert_eq!(score_to_color(-20), score_to_color(0));
        assert_eq!(score_to_color(500), score_to_color(100));
    }

    #[test]
    fn blue_channel_always_zero() {
        for s in 0..=100 {
            assert_eq!(score_to_color(s).b, 0);
        }
    }

    #[test]
    fn hex_formatting() {
        assert_eq!(score_to_color(0).to_hex(), "#ff0000");
        assert_eq!(score_to_color(100).to_hex(), "#00ff00");
    }
}
