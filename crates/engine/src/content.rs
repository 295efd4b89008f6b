//! Content-based recommendation candidates from the topic-adjacency table.
//!
//! The area-relationship table is fixed domain knowledge: foundational
//! topics feed the deep-learning stack, which feeds the generative topics.
//! It is `'static` data built into the binary, never reconstructed per
//! call. Relationship similarity has two tiers (related 0.8, unrelated
//! 0.2) plus self-similarity 1.0, and a pair is related if either side
//! declares the other, which keeps the table symmetric by construction.

use learnscope_model::{Confidence, KnowledgeArea, QuizResult, Recommendation};

/// An area scoring strictly above this counts as a strength.
pub const STRENGTH_THRESHOLD: f64 = 0.70;

const RELATED_SIMILARITY: f64 = 0.8;
const UNRELATED_SIMILARITY: f64 = 0.2;
/// Minimum relationship similarity for a strength to count as related.
const RELATED_CUTOFF: f64 = 0.5;
/// Confidence when no related strengths exist.
const DEFAULT_CONFIDENCE: f64 = 0.6;
/// Confidence ceiling for content candidates.
const MAX_CONFIDENCE: f64 = 0.9;

/// Areas each area is directly related to.
fn related_areas(area: KnowledgeArea) -> &'static [KnowledgeArea] {
    use KnowledgeArea::*;
    match area {
        MlBasics => &[DeepLearning, Pytorch],
        DeepLearning => &[Transformers, Gans, GenerativeAi],
        Pytorch => &[DeepLearning, Gans],
        Transformers => &[GenerativeAi, DeepLearning],
        Gans => &[GenerativeAi, DeepLearning],
        GenerativeAi => &[Transformers, Gans],
    }
}

/// Relationship similarity between two areas.
pub fn area_similarity(a: KnowledgeArea, b: KnowledgeArea) -> f64 {
    if a == b {
        1.0
    } else if related_areas(a).contains(&b) || related_areas(b).contains(&a) {
        RELATED_SIMILARITY
    } else {
        UNRELATED_SIMILARITY
    }
}

/// Curated resource names per area.
pub fn resources_for(area: KnowledgeArea) -> &'static [&'static str] {
    match area {
        KnowledgeArea::MlBasics => &[
            "Machine Learning Yearning by Andrew Ng",
            "Hands-On Machine Learning with Scikit-Learn and TensorFlow",
            "ML Crash Course by Google",
        ],
        KnowledgeArea::DeepLearning => &[
            "Deep Learning by Ian Goodfellow",
            "CS231n: Convolutional Neural Networks for Visual Recognition",
            "Fast.ai Deep Learning for Coders",
        ],
        KnowledgeArea::Pytorch => &[
            "PyTorch Tutorials (official documentation)",
            "Deep Learning with PyTorch by Eli Stevens",
            "PyTorch Lightning documentation",
        ],
        KnowledgeArea::Transformers => &[
            "Attention Is All You Need (original paper)",
            "The Illustrated Transformer by Jay Alammar",
            "Hugging Face Transformers course",
        ],
        KnowledgeArea::Gans => &[
            "Generative Adversarial Networks (original paper)",
            "GAN Specialization on Coursera",
            "PyTorch GAN implementations",
        ],
        KnowledgeArea::GenerativeAi => &[
            "Introduction to Generative AI by Google",
            "Generative Deep Learning book",
            "OpenAI GPT papers and documentation",
        ],
    }
}

/// Coarse time bucket from the learner's current score in the area.
pub fn estimated_time(score: f64) -> &'static str {
    if score < 0.3 {
        "3-4 weeks"
    } else if score < 0.5 {
        "2-3 weeks"
    } else if score < 0.7 {
        "1-2 weeks"
    } else {
        "3-5 days"
    }
}

/// One content-based candidate per recommendation-needed area.
///
/// A weak area gains confidence from related strengths: strong areas
/// (score > 0.70) whose relationship similarity to it clears the cutoff.
/// Confidence is the mean related similarity capped at 0.9, or a flat 0.6
/// when the learner has no related strengths to lean on. Priorities here
/// are provisional insertion order; the blender reassigns them.
pub fn content_candidates(result: &QuizResult) -> Vec<Recommendation> {
    let mut candidates = Vec::new();
    for &area in &result.recommendations_needed {
        let related_strengths: Vec<(KnowledgeArea, f64)> = result
            .strong_areas()
            .filter_map(|(strength, _)| {
                let similarity = area_similarity(area, strength);
                (similarity > RELATED_CUTOFF).then_some((strength, similarity))
            })
            .collect();

        let confidence = if related_strengths.is_empty() {
            DEFAULT_CONFIDENCE
        } else {
            let mean = related_strengths.iter().map(|(_, s)| s).sum::<f64>()
                / related_strengths.len() as f64;
            mean.min(MAX_CONFIDENCE)
        };

        let advice = if related_strengths.is_empty() {
            format!("Build a solid foundation in {area}")
        } else {
            let names: Vec<&str> = related_strengths
                .iter()
                .take(2)
                .map(|(strength, _)| strength.label())
                .collect();
            format!("Build on your strengths in {}", names.join(", "))
        };

        let score = result.area_scores.get(&area).copied().unwrap_or(0.0);
        candidates.push(Recommendation {
            area,
            priority: candidates.len() + 1,
            resources: resources_for(area).iter().map(|s| s.to_string()).collect(),
            estimated_time: estimated_time(score).to_string(),
            confidence: Confidence::new(confidence),
            advice,
        });
    }
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use learnscope_test_utils::result;

    #[test]
    fn test_similarity_is_symmetric() {
        for a in KnowledgeArea::ALL {
            for b in KnowledgeArea::ALL {
                assert_eq!(area_similarity(a, b), area_similarity(b, a));
            }
        }
    }

    #[test]
    fn test_similarity_tiers() {
        assert_eq!(area_similarity(KnowledgeArea::Gans, KnowledgeArea::Gans), 1.0);
        assert_eq!(
            area_similarity(KnowledgeArea::DeepLearning, KnowledgeArea::Gans),
            0.8
        );
        assert_eq!(
            area_similarity(KnowledgeArea::MlBasics, KnowledgeArea::GenerativeAi),
            0.2
        );
    }

    #[test]
    fn test_time_buckets() {
        assert_eq!(estimated_time(0.1), "3-4 weeks");
        assert_eq!(estimated_time(0.4), "2-3 weeks");
        assert_eq!(estimated_time(0.6), "1-2 weeks");
        assert_eq!(estimated_time(0.8), "3-5 days");
    }

    #[test]
    fn test_candidate_per_needed_area() {
        let r = result(
            "s1",
            "u1",
            &[
                (KnowledgeArea::DeepLearning, 0.9),
                (KnowledgeArea::Gans, 0.4),
                (KnowledgeArea::Transformers, 0.65),
            ],
        );
        let candidates = content_candidates(&r);
        let areas: Vec<_> = candidates.iter().map(|c| c.area).collect();
        assert_eq!(areas, vec![KnowledgeArea::Transformers, KnowledgeArea::Gans]);
    }

    #[test]
    fn test_related_strength_confidence() {
        // Gans is weak; DeepLearning (related, 0.8) is strong.
        let r = result(
            "s1",
            "u1",
            &[
                (KnowledgeArea::DeepLearning, 0.9),
                (KnowledgeArea::Gans, 0.4),
            ],
        );
        let candidates = content_candidates(&r);
        let gans = candidates.iter().find(|c| c.area == KnowledgeArea::Gans).unwrap();
        assert!((gans.confidence.value() - 0.8).abs() < 1e-9);
        assert!(gans.advice.contains("deep learning"));
    }

    #[test]
    fn test_no_related_strengths_uses_default_confidence() {
        let r = result("s1", "u1", &[(KnowledgeArea::MlBasics, 0.3)]);
        let candidates = content_candidates(&r);
        assert_eq!(candidates.len(), 1);
        assert!((candidates[0].confidence.value() - DEFAULT_CONFIDENCE).abs() < 1e-9);
        assert_eq!(candidates[0].estimated_time, "2-3 weeks");
    }
}
