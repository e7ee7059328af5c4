//! NLP 모듈 - 질문 텍스트 정규화
//!
//! 카탈로그 질문을 검색 인덱스에 넣기 전에 정규화합니다:
//! 소문자화 -> 토큰화 -> 표제어 추출 -> 불용어 제거.
//! 언어 모델(표제어 추출기, 철자 교정기)은 전역이 아니라
//! 생성 시점에 주입됩니다.

mod lemma;
mod spell;
mod stopwords;

pub use lemma::{EnglishLemmatizer, Lemmatizer};
pub use spell::{NoopCorrector, SpellingCorrector, VocabularyCorrector};
pub use stopwords::{is_stop_word, STOP_WORDS};

// ============================================================================
// Normalizer
// ============================================================================

/// 질문 텍스트 정규화기
///
/// 입력에 대한 순수 함수이며 멱등입니다:
/// `normalize(normalize(s)) == normalize(s)`.
pub struct Normalizer {
    lemmatizer: Box<dyn Lemmatizer>,
}

impl Normalizer {
    /// 표제어 추출기를 주입하여 생성
    pub fn new(lemmatizer: Box<dyn Lemmatizer>) -> Self {
        Self { lemmatizer }
    }

    /// 텍스트 정규화
    ///
    /// 빈 입력(공백 포함)은 빈 문자열을 반환합니다. 실패하지 않습니다.
    pub fn normalize(&self, text: &str) -> String {
        let lemmas: Vec<String> = tokenize(text)
            .map(|token| self.lemmatizer.lemma(&token))
            .filter(|lemma| !is_stop_word(lemma) && !lemma.is_empty())
            .collect();

        lemmas.join(" ")
    }

    /// 표제어 추출기 이름
    pub fn lemmatizer_name(&self) -> &'static str {
        self.lemmatizer.name()
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(Box::new(EnglishLemmatizer::new()))
    }
}

/// 소문자 토큰화
///
/// 영숫자 연속 구간을 토큰으로 추출합니다.
fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_string())
        .collect::<Vec<_>>()
        .into_iter()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_basic() {
        let norm = Normalizer::default();
        assert_eq!(norm.normalize("What are the library hours?"), "library hour");
        assert_eq!(norm.normalize("How do I apply"), "apply");
    }

    #[test]
    fn test_normalize_empty_input() {
        let norm = Normalizer::default();
        assert_eq!(norm.normalize(""), "");
        assert_eq!(norm.normalize("   \t  "), "");
        // 전부 불용어인 입력도 빈 문자열
        assert_eq!(norm.normalize("what is it"), "");
    }

    #[test]
    fn test_normalize_idempotent() {
        let norm = Normalizer::default();
        for text in [
            "What are the library hours?",
            "How do I apply for admission",
            "Tuition fees and payment deadlines",
            "",
            "already normalized text",
        ] {
            let once = norm.normalize(text);
            let twice = norm.normalize(&once);
            assert_eq!(once, twice, "normalize not idempotent for {text:?}");
        }
    }

    #[test]
    fn test_normalize_collapses_whitespace_and_punctuation() {
        let norm = Normalizer::default();
        assert_eq!(
            norm.normalize("Campus   parking -- permits!"),
            "campus parking permit"
        );
    }

    #[test]
    fn test_stub_lemmatizer_injection() {
        struct Identity;
        impl Lemmatizer for Identity {
            fn lemma(&self, token: &str) -> String {
                token.to_string()
            }
            fn name(&self) -> &'static str {
                "identity"
            }
        }

        let norm = Normalizer::new(Box::new(Identity));
        assert_eq!(norm.normalize("Library Hours"), "library hours");
        assert_eq!(norm.lemmatizer_name(), "identity");
    }
}
