use crate::domain::model::RequisiteMode;
use regex::Regex;
use std::sync::LazyLock;

static SENTENCE_BREAK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[\n.!?]").unwrap());

const OVERRIDE_CLAUSES: [&str; 2] = ["consent of professor", "consent of instructor"];

/// 句子是否可能描述先修條件
pub type SentencePredicate = fn(&str) -> bool;

pub fn mentions_requisite(sentence: &str) -> bool {
    let lower = sentence.to_lowercase();
    lower.contains("requisite") || OVERRIDE_CLAUSES.iter().any(|c| lower.contains(c))
}

pub fn every_sentence(_sentence: &str) -> bool {
    true
}

/// 從課程描述中挑出先修句
#[derive(Debug, Clone, Copy)]
pub struct RequisiteExtractor {
    predicate: SentencePredicate,
}

impl RequisiteExtractor {
    pub fn new(mode: RequisiteMode) -> Self {
        match mode {
            RequisiteMode::Substring => Self::with_predicate(mentions_requisite),
            RequisiteMode::EverySentence => Self::with_predicate(every_sentence),
        }
    }

    pub fn with_predicate(predicate: SentencePredicate) -> Self {
        Self { predicate }
    }

    /// 回傳所有符合條件的句子，以空白串接；描述為空時回傳空字串
    pub fn extract(&self, description: &str) -> String {
        if description.trim().is_empty() {
            return String::new();
        }

        let normalized = description.replace('\u{a0}', " ");
        SENTENCE_BREAK
            .split(&normalized)
            .map(str::trim)
            .filter(|s| !s.is_empty() && (self.predicate)(s))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Default for RequisiteExtractor {
    fn default() -> Self {
        Self::new(RequisiteMode::default())
    }
}
