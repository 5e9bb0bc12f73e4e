mod extractor;
mod vocabulary;

pub use extractor::{
    CandidateSignal, ExtractedResume, ExtractionDegraded, ResumeSignalExtractor, StoredResume,
};
pub use vocabulary::SkillVocabulary;
