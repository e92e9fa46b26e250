// Copyright 2026 Hypermesh Foundation. All rights reserved.
// VISION 2060 Survey Engine - Likert Opinion Questions

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Lowest score on the importance scale.
pub const LIKERT_MIN: u8 = 1;
/// Highest score on the importance scale.
pub const LIKERT_MAX: u8 = 9;
/// Score given to every question when a respondent record is created.
pub const LIKERT_DEFAULT: u8 = 3;

/// One opinion question. `emphasis` is the phrase rendered in bold.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct LikertQuestion {
    pub id: &'static str,
    pub text: &'static str,
    pub emphasis: &'static str,
}

pub const LIKERT_QUESTIONS: [LikertQuestion; 9] = [
    LikertQuestion {
        id: "regional_economy",
        text: "…the forest-based sector strengthens its role in regional economies, for example by generating revenues, creating jobs, and maintaining profitable operations?",
        emphasis: "strengthens its role in regional economies",
    },
    LikertQuestion {
        id: "local_owners",
        text: "…the forest-based sector supports local forest owners by prioritizing the use of locally sourced wood and services?",
        emphasis: "supports local forest owners",
    },
    LikertQuestion {
        id: "carbon_substitution",
        text: "…future end-use applications emphasize the use of wood as a substitute for other materials, for example in construction or through innovative bioeconomy solutions?",
        emphasis: "wood as a substitute",
    },
    LikertQuestion {
        id: "carbon_storage",
        text: "…the forest-based sector actively enhances forest growth and increases carbon storage in forests to reduce overall environmental impacts (for example greenhouse gas emissions)?",
        emphasis: "enhances forest growth and increases carbon storage",
    },
    LikertQuestion {
        id: "biodiversity",
        text: "…forest management activities should avoid negative impacts on biodiversity and to actively protect or restore forest habitats?",
        emphasis: "biodiversity and to actively protect or restore forest habitats?",
    },
    LikertQuestion {
        id: "local_sourcing",
        text: "…forest-based sector and wood construction favor local sourcing and production to reduce transport-related environmental impacts?",
        emphasis: "to reduce transport-related environmental impacts",
    },
    LikertQuestion {
        id: "employment_conditions",
        text: "…the forest-based sector provides stable employment opportunities and promotes fair working conditions in the region?",
        emphasis: "provides stable employment opportunities and promotes fair working conditions",
    },
    LikertQuestion {
        id: "training_development",
        text: "…the forest-based sector strengthens regional capacity by providing professional development, training, and career advancement opportunities for its employees?",
        emphasis: "strengthens regional capacity by providing",
    },
    LikertQuestion {
        id: "community_engagement",
        text: "…the forest-based sector actively collaborates with local communities?",
        emphasis: "collaborates with local communities?",
    },
];

pub fn question(id: &str) -> Option<&'static LikertQuestion> {
    LIKERT_QUESTIONS.iter().find(|q| q.id == id)
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LikertError {
    #[error("unknown likert question: {0}")]
    UnknownQuestion(String),

    #[error("score {score} for {question} is outside the 1..=9 scale")]
    OutOfRange { question: String, score: u8 },

    #[error("no answer for {0}")]
    Missing(String),
}

/// Answer to one question. A "cannot answer" flag keeps the score but marks
/// it as not given.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LikertAnswer {
    pub score: u8,
    pub cannot_answer: bool,
}

impl Default for LikertAnswer {
    fn default() -> Self {
        Self { score: LIKERT_DEFAULT, cannot_answer: false }
    }
}

/// Answers keyed by question id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LikertSheet {
    answers: BTreeMap<String, LikertAnswer>,
}

impl Default for LikertSheet {
    fn default() -> Self {
        Self {
            answers: LIKERT_QUESTIONS
                .iter()
                .map(|q| (q.id.to_string(), LikertAnswer::default()))
                .collect(),
        }
    }
}

impl LikertSheet {
    pub fn get(&self, id: &str) -> Option<LikertAnswer> {
        self.answers.get(id).copied()
    }

    /// Record an answer, rejecting unknown questions and out-of-range scores.
    pub fn answer(&mut self, id: &str, score: u8, cannot_answer: bool) -> Result<(), LikertError> {
        let q = question(id).ok_or_else(|| LikertError::UnknownQuestion(id.to_string()))?;
        check_score(q.id, score)?;
        self.answers.insert(q.id.to_string(), LikertAnswer { score, cannot_answer });
        Ok(())
    }

    /// Every question answered, every score on the scale, no stray ids.
    /// Sheets arriving through deserialization are not checked otherwise.
    pub fn validate(&self) -> Result<(), LikertError> {
        for id in self.answers.keys() {
            if question(id).is_none() {
                return Err(LikertError::UnknownQuestion(id.clone()));
            }
        }
        for q in &LIKERT_QUESTIONS {
            let a = self
                .answers
                .get(q.id)
                .ok_or_else(|| LikertError::Missing(q.id.to_string()))?;
            check_score(q.id, a.score)?;
        }
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &LikertAnswer)> {
        self.answers.iter().map(|(k, v)| (k.as_str(), v))
    }
}

fn check_score(id: &str, score: u8) -> Result<(), LikertError> {
    if (LIKERT_MIN..=LIKERT_MAX).contains(&score) {
        Ok(())
    } else {
        Err(LikertError::OutOfRange { question: id.to_string(), score })
    }
}
