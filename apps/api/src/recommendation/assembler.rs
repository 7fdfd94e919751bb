use crate::models::recommendation::RecommendationView;
use crate::recommendation::ranker::ScoredAssessment;

/// Projects ranked entries onto the external result shape, preserving order.
/// The score is internal unless the caller asked for it.
pub fn assemble(ranked: &[ScoredAssessment<'_>], include_scores: bool) -> Vec<RecommendationView> {
    ranked
        .iter()
        .map(|s| RecommendationView {
            assessment_name: s.assessment.name.clone(),
            assessment_url: s.assessment.url.clone(),
            category: s.assessment.category.clone(),
            test_type: s.assessment.test_type.clone(),
            score: include_scores.then_some(s.score),
        })
        .collect()
}
