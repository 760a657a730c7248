use prep_core::model::{CardId, Chapter, Flashcard};

/// Fixed default study content: the seven CPP exam domains with their
/// starter flashcards.
///
/// Card ids are stable across releases (chapter number × 100 + ordinal) so
/// persisted review state re-attaches after a content update. This content
/// is never persisted; only the per-card state flags are.
#[must_use]
pub fn default_chapters() -> Vec<Chapter> {
    vec![
        chapter(
            1,
            "Security Principles and Practices",
            &[
                (
                    101,
                    "What are the three components of the security triad?",
                    "Confidentiality, integrity, and availability.",
                ),
                (
                    102,
                    "What is defense in depth?",
                    "Layering multiple security controls so the failure of one layer is covered by the next.",
                ),
                (
                    103,
                    "What is the primary purpose of a security risk assessment?",
                    "To identify assets, threats, and vulnerabilities, and to prioritize mitigation by likelihood and impact.",
                ),
            ],
        ),
        chapter(
            2,
            "Business Principles and Practices",
            &[
                (
                    201,
                    "What does a cost-benefit analysis compare?",
                    "The cost of a countermeasure against the expected reduction in loss.",
                ),
                (
                    202,
                    "What is a security master plan?",
                    "A long-range planning document aligning security programs with organizational goals.",
                ),
                (
                    203,
                    "What is return on investment in a security context?",
                    "The financial benefit of a security measure relative to its cost.",
                ),
            ],
        ),
        chapter(
            3,
            "Investigations",
            &[
                (
                    301,
                    "What is the chain of custody?",
                    "Documentation of who held evidence, when, and how it was transferred, preserving its integrity.",
                ),
                (
                    302,
                    "What distinguishes an interview from an interrogation?",
                    "An interview gathers information from a cooperative subject; an interrogation seeks an admission from a suspect.",
                ),
                (
                    303,
                    "What is surveillance?",
                    "Covert, continuous observation of persons, places, or things to obtain information.",
                ),
            ],
        ),
        chapter(
            4,
            "Personnel Security",
            &[
                (
                    401,
                    "What is the purpose of pre-employment screening?",
                    "To verify a candidate's background and identify risk factors before hire.",
                ),
                (
                    402,
                    "What is an insider threat?",
                    "Harm caused by a person with authorized access who misuses that access.",
                ),
                (
                    403,
                    "What does a workplace violence prevention program include?",
                    "Policy, a threat assessment team, reporting channels, and response procedures.",
                ),
            ],
        ),
        chapter(
            5,
            "Physical Security",
            &[
                (
                    501,
                    "What does CPTED stand for?",
                    "Crime Prevention Through Environmental Design.",
                ),
                (
                    502,
                    "Name the three lines of physical defense.",
                    "The perimeter, the building exterior, and interior spaces.",
                ),
                (
                    503,
                    "How do natural and structural barriers differ?",
                    "Natural barriers are terrain features; structural barriers are built, such as fences and walls.",
                ),
            ],
        ),
        chapter(
            6,
            "Information Security",
            &[
                (
                    601,
                    "How do a vulnerability and a threat differ?",
                    "A vulnerability is a weakness; a threat is a potential event that could exploit it.",
                ),
                (
                    602,
                    "What is data classification?",
                    "Labeling information by sensitivity to drive handling and access controls.",
                ),
                (
                    603,
                    "What is the principle of least privilege?",
                    "Granting users only the access required to perform their duties.",
                ),
            ],
        ),
        chapter(
            7,
            "Crisis Management",
            &[
                (
                    701,
                    "How do business continuity and disaster recovery plans differ?",
                    "Continuity keeps critical functions running during disruption; disaster recovery restores systems afterwards.",
                ),
                (
                    702,
                    "What are the four phases of emergency management?",
                    "Mitigation, preparedness, response, and recovery.",
                ),
                (
                    703,
                    "What is a tabletop exercise?",
                    "A discussion-based walkthrough of an emergency plan against a hypothetical scenario.",
                ),
            ],
        ),
    ]
}

fn chapter(number: u32, title: &str, cards: &[(u64, &str, &str)]) -> Chapter {
    let cards = cards
        .iter()
        .map(|(id, question, answer)| {
            Flashcard::new(CardId::new(*id), *question, *answer)
                .expect("catalog card content is non-empty")
        })
        .collect();
    Chapter::new(number, title, cards).expect("catalog chapter is well-formed")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn catalog_has_seven_domains_in_order() {
        let chapters = default_chapters();
        let numbers: Vec<u32> = chapters.iter().map(Chapter::number).collect();
        assert_eq!(numbers, vec![1, 2, 3, 4, 5, 6, 7]);
    }

    #[test]
    fn catalog_card_ids_are_globally_unique() {
        let chapters = default_chapters();
        let mut seen = HashSet::new();
        for chapter in &chapters {
            for card in chapter.cards() {
                assert!(seen.insert(card.id()), "duplicate id {:?}", card.id());
            }
        }
    }

    #[test]
    fn catalog_starts_with_zero_progress() {
        for chapter in default_chapters() {
            assert_eq!(chapter.progress_percentage(), 0.0);
            assert_eq!(chapter.favorite_count(), 0);
        }
    }
}
