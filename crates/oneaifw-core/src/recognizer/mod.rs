pub mod ner;
pub mod regex_recognizer;

pub use ner::NerRecognizer;
pub use regex_recognizer::{PresetPatternSpec, RegexRecognizer, Validator, PRESET_PATTERNS};
