//! 표제어 추출 (lemmatization)
//!
//! 굴절형 단어를 사전 기본형으로 환원합니다.
//! 외부 언어 모델 대신 주입 가능한 트레이트로 추상화되어 있어
//! 테스트에서 스텁 구현으로 교체할 수 있습니다.

// ============================================================================
// Lemmatizer Trait
// ============================================================================

/// 표제어 추출 트레이트
///
/// 토큰 하나를 기본형으로 환원하는 인터페이스입니다.
/// 구현은 반드시 멱등이어야 합니다: `lemma(lemma(t)) == lemma(t)`.
pub trait Lemmatizer: Send + Sync {
    /// 토큰을 기본형으로 환원
    fn lemma(&self, token: &str) -> String;

    /// 구현 이름
    fn name(&self) -> &'static str;
}

// ============================================================================
// EnglishLemmatizer
// ============================================================================

/// 불규칙 변화형 -> 기본형 매핑
///
/// 출력은 다시 이 테이블의 키가 되지 않아야 합니다 (멱등성 보장).
const IRREGULAR: &[(&str, &str)] = &[
    // be 동사
    ("am", "be"),
    ("are", "be"),
    ("been", "be"),
    ("being", "be"),
    ("is", "be"),
    ("was", "be"),
    ("were", "be"),
    // 조동사 / 고빈도 동사
    ("did", "do"),
    ("does", "do"),
    ("done", "do"),
    ("doing", "do"),
    ("goes", "go"),
    ("going", "go"),
    ("gone", "go"),
    ("went", "go"),
    ("had", "have"),
    ("has", "have"),
    ("having", "have"),
    ("got", "get"),
    ("gotten", "get"),
    ("made", "make"),
    ("said", "say"),
    ("taken", "take"),
    ("took", "take"),
    // 불규칙 명사 복수형
    ("children", "child"),
    ("feet", "foot"),
    ("geese", "goose"),
    ("men", "man"),
    ("mice", "mouse"),
    ("people", "person"),
    ("teeth", "tooth"),
    ("women", "woman"),
];

/// 규칙 기반 영어 표제어 추출기
///
/// 불규칙 매핑과 복수형 접미사 규칙만 처리하는 경량 구현입니다.
/// 완전한 언어 모델의 대역이며, `Lemmatizer` 자리에 주입됩니다.
#[derive(Debug, Default)]
pub struct EnglishLemmatizer;

impl EnglishLemmatizer {
    pub fn new() -> Self {
        Self
    }

    /// 복수형 접미사 규칙
    ///
    /// 각 규칙의 출력은 다른 규칙을 다시 발동시키지 않습니다.
    fn strip_plural(token: &str) -> String {
        let n = token.len();

        // 3자 이하는 그대로 둔다 ("bus", "is" 같은 오절단 방지)
        if n <= 3 {
            return token.to_string();
        }

        // studies -> study
        if let Some(stem) = token.strip_suffix("ies") {
            if !stem.is_empty() {
                return format!("{stem}y");
            }
        }

        // classes -> class, watches -> watch, boxes -> box
        for suffix in ["sses", "shes", "ches", "xes", "zes", "oes"] {
            if token.ends_with(suffix) {
                return token[..n - 2].to_string();
            }
        }

        // hours -> hour. -ss/-us/-is로 끝나는 단어는 복수형이 아님
        if token.ends_with('s')
            && !token.ends_with("ss")
            && !token.ends_with("us")
            && !token.ends_with("is")
        {
            return token[..n - 1].to_string();
        }

        token.to_string()
    }
}

impl Lemmatizer for EnglishLemmatizer {
    fn lemma(&self, token: &str) -> String {
        if let Some((_, base)) = IRREGULAR.iter().find(|(form, _)| *form == token) {
            return (*base).to_string();
        }
        Self::strip_plural(token)
    }

    fn name(&self) -> &'static str {
        "english-rules"
    }
}

// ============================================================================
// Tests
// ============================================================================
