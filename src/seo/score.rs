//! Deterministic SEO scoring
//!
//! | Signal | Condition | Points |
//! |--------|-----------|--------|
//! | Title | length 30-60 | 20 |
//! | Title | other length | 10 |
//! | Description | length 120-160 | 20 |
//! | Description | other length | 10 |
//! | H1 | at least one | 15 |
//! | Canonical | present | 10 |
//! | Open Graph | title and description | 15 |
//! | Open Graph | exactly one of them | 8 |
//! | Twitter card | present | 10 |
//! | Alt coverage | any images | floor(10 x covered / total) |
//!
//! The maximum is exactly 100. Lengths are counted in characters.

use serde::{Serialize, Serializer};
use std::fmt;

/// The fields a score is computed from
#[derive(Debug, Clone, Copy, Default)]
pub struct ScoreInputs<'a> {
    pub title: Option<&'a str>,
    pub description: Option<&'a str>,
    pub h1_count: usize,
    pub has_canonical: bool,
    pub has_og_title: bool,
    pub has_og_description: bool,
    pub has_twitter_card: bool,
    pub total_images: usize,
    pub images_without_alt: usize,
}

/// Letter grade derived from a score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SeoGrade {
    APlus,
    A,
    B,
    C,
    D,
    #[default]
    F,
}

impl SeoGrade {
    /// Maps a score to a grade (inclusive lower bounds 90/80/70/60/50)
    pub fn from_score(score: u8) -> Self {
        match score {
            90..=u8::MAX => Self::APlus,
            80..=89 => Self::A,
            70..=79 => Self::B,
            60..=69 => Self::C,
            50..=59 => Self::D,
            _ => Self::F,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::APlus => "A+",
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
            Self::F => "F",
        }
    }
}

impl fmt::Display for SeoGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for SeoGrade {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Computes the 0-100 score
pub fn compute_score(inputs: &ScoreInputs<'_>) -> u8 {
    let mut score: u32 = 0;

    if let Some(title) = inputs.title {
        score += if (30..=60).contains(&title.chars().count()) {
            20
        } else {
            10
        };
    }

    if let Some(description) = inputs.description {
        score += if (120..=160).contains(&description.chars().count()) {
            20
        } else {
            10
        };
    }

    if inputs.h1_count > 0 {
        score += 15;
    }

    if inputs.has_canonical {
        score += 10;
    }

    score += match (inputs.has_og_title, inputs.has_og_description) {
        (true, true) => 15,
        (true, false) | (false, true) => 8,
        (false, false) => 0,
    };

    if inputs.has_twitter_card {
        score += 10;
    }

    if inputs.total_images > 0 {
        let covered = inputs.total_images.saturating_sub(inputs.images_without_alt);
        score += (10 * covered / inputs.total_images) as u32;
    }

    score.min(100) as u8
}
