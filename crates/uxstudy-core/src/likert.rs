//! Five-point Likert scales.
//!
//! Participants see labelled options such as `"4 - Agree"`; datasets store the
//! leading integer. Each scale is a closed enum so an unknown label can only
//! appear at the parsing boundary, never inside a response builder.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A fixed five-label ordinal scale mapped onto 1..=5.
pub trait LikertScale: Copy + Sized + 'static {
    /// All options in ascending order.
    const ALL: [Self; 5];

    /// The label shown to participants.
    fn label(self) -> &'static str;

    /// The stored integer value, 1..=5.
    fn value(self) -> u8;

    /// Look up an option by its exact label.
    fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|o| o.label() == label)
    }

    /// Look up an option by its stored value.
    fn from_value(value: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|o| o.value() == value)
    }

    /// Every label in ascending order.
    fn labels() -> [&'static str; 5] {
        Self::ALL.map(|o| o.label())
    }
}

/// Agreement-style scale used by the exit questionnaire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Agreement {
    StronglyDisagree,
    Disagree,
    Neutral,
    Agree,
    StronglyAgree,
}

impl LikertScale for Agreement {
    const ALL: [Self; 5] = [
        Agreement::StronglyDisagree,
        Agreement::Disagree,
        Agreement::Neutral,
        Agreement::Agree,
        Agreement::StronglyAgree,
    ];

    fn label(self) -> &'static str {
        match self {
            Agreement::StronglyDisagree => "1 - Strongly Disagree",
            Agreement::Disagree => "2 - Disagree",
            Agreement::Neutral => "3 - Neutral",
            Agreement::Agree => "4 - Agree",
            Agreement::StronglyAgree => "5 - Strongly Agree",
        }
    }

    fn value(self) -> u8 {
        match self {
            Agreement::StronglyDisagree => 1,
            Agreement::Disagree => 2,
            Agreement::Neutral => 3,
            Agreement::Agree => 4,
            Agreement::StronglyAgree => 5,
        }
    }
}

/// Quality-style scale used for familiarity, difficulty and task satisfaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Quality {
    VeryPoor,
    Poor,
    Fair,
    Good,
    Excellent,
}

impl LikertScale for Quality {
    const ALL: [Self; 5] = [
        Quality::VeryPoor,
        Quality::Poor,
        Quality::Fair,
        Quality::Good,
        Quality::Excellent,
    ];

    fn label(self) -> &'static str {
        match self {
            Quality::VeryPoor => "1 - Very Poor",
            Quality::Poor => "2 - Poor",
            Quality::Fair => "3 - Fair",
            Quality::Good => "4 - Good",
            Quality::Excellent => "5 - Excellent",
        }
    }

    fn value(self) -> u8 {
        match self {
            Quality::VeryPoor => 1,
            Quality::Poor => 2,
            Quality::Fair => 3,
            Quality::Good => 4,
            Quality::Excellent => 5,
        }
    }
}

impl fmt::Display for Agreement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Agreement {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_label(s.trim()).ok_or_else(|| format!("unknown agreement label: {s}"))
    }
}

impl FromStr for Quality {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_label(s.trim()).ok_or_else(|| format!("unknown quality label: {s}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_bijective<S: LikertScale + PartialEq + fmt::Debug>() {
        let mut seen = Vec::new();
        for option in S::ALL {
            let value = option.value();
            assert!((1..=5).contains(&value));
            assert!(!seen.contains(&value), "duplicate value {value}");
            seen.push(value);

            assert_eq!(S::from_label(option.label()), Some(option));
            assert_eq!(S::from_value(value), Some(option));
        }
        assert_eq!(seen, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn agreement_mapping_is_bijective() {
        assert_bijective::<Agreement>();
    }

    #[test]
    fn quality_mapping_is_bijective() {
        assert_bijective::<Quality>();
    }

    #[test]
    fn labels_carry_leading_value() {
        for label in Agreement::labels().iter().chain(Quality::labels().iter()) {
            let lead: u8 = label[..1].parse().unwrap();
            let parsed = Agreement::from_label(label)
                .map(|a| a.value())
                .or_else(|| Quality::from_label(label).map(|q| q.value()));
            assert_eq!(parsed, Some(lead));
        }
    }

    #[test]
    fn unknown_labels_and_values() {
        assert_eq!(Agreement::from_label("4 - Good"), None);
        assert_eq!(Quality::from_label("4 - Agree"), None);
        assert_eq!(Quality::from_value(0), None);
        assert_eq!(Agreement::from_value(6), None);
        assert!("6 - Amazing".parse::<Quality>().is_err());
        assert_eq!("3 - Neutral".parse::<Agreement>().unwrap(), Agreement::Neutral);
    }
}
