use crate::domain::model::{NumberRule, CODE_SEPARATOR};
use regex::Regex;
use std::collections::BTreeSet;
use std::sync::LazyLock;

static WORD_BREAK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[ \-,/;.]").unwrap());

/// 從先修句中推斷課程代碼
///
/// 由左至右掃描詞元並維護「目前科系」游標：遇到已知科系代碼就切換游標，
/// 遇到課程編號就以游標補上科系。因此 "ECON 101 or 201" 中的 201 也屬於 ECON。
#[derive(Debug, Clone)]
pub struct CourseCodeTokenizer<'a> {
    departments: &'a BTreeSet<String>,
    rule: NumberRule,
    known_numbers: Option<&'a BTreeSet<String>>,
}

impl<'a> CourseCodeTokenizer<'a> {
    pub fn new(departments: &'a BTreeSet<String>, rule: NumberRule) -> Self {
        Self {
            departments,
            rule,
            known_numbers: None,
        }
    }

    /// `NumberRule::KnownNumbers` 比對用的編號集合 (大寫)；未提供時不輸出任何代碼
    pub fn with_known_numbers(mut self, numbers: &'a BTreeSet<String>) -> Self {
        self.known_numbers = Some(numbers);
        self
    }

    pub fn tokenize(&self, line: &str, own_department: &str) -> Vec<String> {
        let normalized = line.replace('\u{a0}', " ");
        let mut cursor = own_department.to_uppercase();
        let mut codes = Vec::new();

        for word in WORD_BREAK.split(&normalized).filter(|w| !w.is_empty()) {
            let upper = word.to_uppercase();
            if self.departments.contains(&upper) {
                cursor = upper;
                continue;
            }
            if self.is_course_number(word, &upper) {
                codes.push(format!("{}{}{}", cursor, CODE_SEPARATOR, upper));
            }
        }

        codes
    }

    fn is_course_number(&self, word: &str, upper: &str) -> bool {
        let numeric = word.chars().all(|c| c.is_ascii_digit());
        match self.rule {
            NumberRule::Numeric => numeric,
            NumberRule::ThreeDigit => numeric && word.len() == 3,
            NumberRule::KnownNumbers => self.known_numbers.is_some_and(|known| known.contains(upper)),
        }
    }
}
