//! Rule-based emotion classification for mascot animation.
//!
//! Maps answer text to one of a fixed set of labels the front end knows how
//! to animate. Keyword checks take priority, then sentiment polarity, then
//! answer length.

use serde::{Deserialize, Serialize};

/// Emotion labels the mascot front end animates on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    Neutral,
    Thinking,
    Surprised,
    Happy,
    Sad,
    Explaining,
}

impl std::fmt::Display for Emotion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Emotion::Neutral => "neutral",
            Emotion::Thinking => "thinking",
            Emotion::Surprised => "surprised",
            Emotion::Happy => "happy",
            Emotion::Sad => "sad",
            Emotion::Explaining => "explaining",
        };
        write!(f, "{}", label)
    }
}

/// Keywords that signal the mascot should look thoughtful.
const ADVICE_KEYWORDS: &[&str] = &["suggest", "recommend", "should", "consider", "advice"];

/// Keywords that signal surprise.
const SURPRISE_KEYWORDS: &[&str] = &["wow", "amazing", "incredible", "surprising"];

/// Polarity threshold above which the answer reads as positive.
const HAPPY_THRESHOLD: f32 = 0.3;

/// Polarity threshold below which the answer reads as negative.
const SAD_THRESHOLD: f32 = -0.3;

/// Word-count boundary under which short answers stay neutral.
const SHORT_ANSWER_WORDS: usize = 5;

/// Weighted sentiment lexicon. Values are in [-1, 1]; the polarity of a text
/// is the mean over the sentiment-bearing words it contains.
const SENTIMENT_LEXICON: &[(&str, f32)] = &[
    // positive
    ("good", 0.7),
    ("great", 0.8),
    ("excellent", 1.0),
    ("wonderful", 1.0),
    ("fantastic", 0.9),
    ("best", 1.0),
    ("happy", 0.8),
    ("love", 0.5),
    ("enjoy", 0.5),
    ("helpful", 0.5),
    ("useful", 0.4),
    ("easy", 0.45),
    ("fun", 0.3),
    ("beautiful", 0.85),
    ("success", 0.6),
    ("successful", 0.75),
    ("important", 0.4),
    ("perfect", 1.0),
    ("better", 0.5),
    ("well", 0.4),
    // negative
    ("bad", -0.7),
    ("terrible", -1.0),
    ("awful", -1.0),
    ("worst", -1.0),
    ("poor", -0.4),
    ("sad", -0.5),
    ("hate", -0.8),
    ("hard", -0.3),
    ("difficult", -0.5),
    ("problem", -0.4),
    ("wrong", -0.5),
    ("fail", -0.5),
    ("failure", -0.6),
    ("unfortunately", -0.5),
    ("error", -0.4),
    ("dangerous", -0.6),
    ("harmful", -0.6),
    ("loss", -0.4),
    ("worse", -0.6),
    ("never", -0.3),
];

/// Classifies answer text into a mascot emotion.
#[derive(Debug, Clone, Default)]
pub struct EmotionClassifier;

impl EmotionClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Classify an answer. First matching rule wins.
    pub fn classify(&self, answer: &str) -> Emotion {
        if answer.trim().is_empty() {
            return Emotion::Neutral;
        }

        let lower = answer.to_lowercase();
        let num_words = lower.split_whitespace().count();

        if ADVICE_KEYWORDS.iter().any(|k| lower.contains(k)) {
            return Emotion::Thinking;
        }
        if SURPRISE_KEYWORDS.iter().any(|k| lower.contains(k)) {
            return Emotion::Surprised;
        }

        let polarity = self.polarity(&lower);
        if polarity > HAPPY_THRESHOLD {
            return Emotion::Happy;
        }
        if polarity < SAD_THRESHOLD {
            return Emotion::Sad;
        }

        if num_words < SHORT_ANSWER_WORDS {
            return Emotion::Neutral;
        }

        Emotion::Explaining
    }

    /// Mean polarity of the sentiment-bearing words in `text`, in [-1, 1].
    ///
    /// Expects lowercased input. Returns 0.0 when no lexicon word appears.
    pub fn polarity(&self, text: &str) -> f32 {
        let mut total = 0.0f32;
        let mut matched = 0usize;

        for word in text
            .split_whitespace()
            .map(|w| w.trim_matches(|c: char| c.is_ascii_punctuation()))
        {
            if let Some((_, weight)) = SENTIMENT_LEXICON.iter().find(|(w, _)| *w == word) {
                total += weight;
                matched += 1;
            }
        }

        if matched == 0 {
            0.0
        } else {
            total / matched as f32
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_answer_is_neutral() {
        let classifier = EmotionClassifier::new();
        assert_eq!(classifier.classify(""), Emotion::Neutral);
        assert_eq!(classifier.classify("   "), Emotion::Neutral);
    }

    #[test]
    fn test_advice_keywords_win() {
        let classifier = EmotionClassifier::new();
        assert_eq!(
            classifier.classify("I would recommend reviewing the chapter on fractions."),
            Emotion::Thinking
        );
        // Advice outranks positive sentiment
        assert_eq!(
            classifier.classify("You should try this, it is great and wonderful!"),
            Emotion::Thinking
        );
    }

    #[test]
    fn test_surprise_keywords() {
        let classifier = EmotionClassifier::new();
        assert_eq!(
            classifier.classify("Wow, octopuses have three hearts."),
            Emotion::Surprised
        );
    }

    #[test]
    fn test_polarity_drives_happy_and_sad() {
        let classifier = EmotionClassifier::new();
        assert_eq!(
            classifier.classify("This is a great and wonderful result."),
            Emotion::Happy
        );
        assert_eq!(
            classifier.classify("That was a terrible failure, unfortunately."),
            Emotion::Sad
        );
    }

    #[test]
    fn test_short_answer_is_neutral() {
        let classifier = EmotionClassifier::new();
        assert_eq!(classifier.classify("Yes, that is correct."), Emotion::Neutral);
    }

    #[test]
    fn test_long_factual_answer_is_explaining() {
        let classifier = EmotionClassifier::new();
        let answer = "Photosynthesis is the process by which plants convert light \
                      energy into chemical energy stored in glucose molecules.";
        assert_eq!(classifier.classify(answer), Emotion::Explaining);
    }

    #[test]
    fn test_polarity_range() {
        let classifier = EmotionClassifier::new();
        assert_eq!(classifier.polarity("the sky has clouds"), 0.0);
        assert!(classifier.polarity("excellent wonderful perfect") > 0.9);
        assert!(classifier.polarity("terrible awful worst") < -0.9);
    }

    #[test]
    fn test_label_serialization() {
        assert_eq!(serde_json::to_string(&Emotion::Explaining).unwrap(), "\"explaining\"");
        assert_eq!(serde_json::to_string(&Emotion::Neutral).unwrap(), "\"neutral\"");
        assert_eq!(Emotion::Surprised.to_string(), "surprised");
    }
}
