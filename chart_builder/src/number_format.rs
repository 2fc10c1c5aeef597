use crate::config::{NumberFormat, NumberFormatPreset};

impl NumberFormatPreset {
    /// Reads a preset as sent by the format selector. The user values are only
    /// used by `other`.
    pub fn parse(
        name: &str,
        prefix: &str,
        suffix: &str,
        min: &str,
        max: &str,
    ) -> Option<NumberFormatPreset> {
        match name.trim() {
            "none" | "" => Some(NumberFormatPreset::None),
            "percent" => Some(NumberFormatPreset::Percent),
            "other" => Some(NumberFormatPreset::Other {
                prefix: prefix.to_string(),
                suffix: suffix.to_string(),
                min: crate::series_format::parse_number(min),
                max: crate::series_format::parse_number(max),
            }),
            _ => None,
        }
    }
}

impl NumberFormat {
    pub const NONE: NumberFormat = NumberFormat {
        multiplier: 1.0,
        prefix: String::new(),
        suffix: String::new(),
        min: None,
        max: None,
    };

    pub fn from_preset(preset: &NumberFormatPreset) -> NumberFormat {
        match preset {
            NumberFormatPreset::None => NumberFormat::NONE,
            NumberFormatPreset::Percent => NumberFormat {
                suffix: "%".to_string(),
                min: Some(0.0),
                max: Some(100.0),
                ..NumberFormat::NONE
            },
            NumberFormatPreset::Other {
                prefix,
                suffix,
                min,
                max,
            } => NumberFormat {
                prefix: prefix.clone(),
                suffix: suffix.clone(),
                min: *min,
                max: *max,
                ..NumberFormat::NONE
            },
        }
    }

    /// Scales a series value. Any multiplier other than 1 rounds the result
    /// to two decimal places.
    pub fn apply_multiplier(&self, value: f64) -> f64 {
        apply_multiplier(value, self.multiplier)
    }
}

impl Default for NumberFormat {
    fn default() -> Self {
        NumberFormat::NONE
    }
}

pub fn apply_multiplier(value: f64, multiplier: f64) -> f64 {
    if multiplier == 1.0 {
        value
    } else {
        (value * multiplier * 100.0).round() / 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets() {
        assert_eq!(
            NumberFormat::from_preset(&NumberFormatPreset::None),
            NumberFormat {
                multiplier: 1.0,
                prefix: "".to_string(),
                suffix: "".to_string(),
                min: None,
                max: None
            }
        );
        let percent = NumberFormat::from_preset(&NumberFormatPreset::Percent);
        assert_eq!(percent.suffix, "%");
        assert_eq!(percent.min, Some(0.0));
        assert_eq!(percent.max, Some(100.0));
        assert_eq!(percent.multiplier, 1.0);
    }

    #[test]
    fn other_uses_user_values() {
        let preset = NumberFormatPreset::parse("other", "£", "k", "0", "").unwrap();
        let f = NumberFormat::from_preset(&preset);
        assert_eq!(f.prefix, "£");
        assert_eq!(f.suffix, "k");
        assert_eq!(f.min, Some(0.0));
        assert_eq!(f.max, None);
    }

    #[test]
    fn unknown_preset() {
        assert_eq!(NumberFormatPreset::parse("currency", "", "", "", ""), None);
    }

    #[test]
    fn multiplier() {
        assert_eq!(apply_multiplier(12.3456, 1.0), 12.3456);
        assert_eq!(apply_multiplier(0.123456, 100.0), 12.35);
        let f = NumberFormat {
            multiplier: 1000.0,
            ..NumberFormat::NONE
        };
        assert_eq!(f.apply_multiplier(1.5), 1500.0);
    }
}
