//! faqbot - 오프라인 FAQ 챗봇 코어
//!
//! CSV 시트로 관리되는 FAQ 코퍼스 위에서 퍼지 매칭, TF-IDF 키워드
//! 매칭, 임베딩 시맨틱 매칭을 3단 폴백으로 수행하는 답변 검색
//! 엔진입니다.

pub mod catalog;
pub mod cli;
pub mod dataset;
pub mod embedding;
pub mod index;
pub mod nlp;
pub mod resolver;
pub mod session;

// Re-exports
pub use catalog::{CatalogBuilder, FaqCatalog, FaqRecord, DEFAULT_ANSWER};
pub use dataset::{default_dataset_dir, get_data_dir, load_sheets, DatasetError, SheetSet};
pub use embedding::{
    create_embedder, get_api_key, has_api_key, EmbeddingProvider, GeminiEmbedding, HashEmbedding,
};
pub use index::{KeywordIndex, TfidfModel, VectorIndex};
pub use nlp::{EnglishLemmatizer, Lemmatizer, Normalizer, SpellingCorrector, VocabularyCorrector};
pub use resolver::{MatchResult, MatchTier, Resolver, ResolverConfig, UNRESOLVED_MESSAGE};
pub use session::{Answer, Session, SessionStats};
