// Unit and property tests for the matching core

use candidate_matcher::core::{
    combine_candidates, filter_by_opinions, match_by_title, normalize_skill_name,
    skill_rarity_points, title_query, TitleQuery,
};
use candidate_matcher::models::{CandidateId, JobStatus, OpinionKind, OpinionScope};
use candidate_matcher::services::InMemoryStore;
use proptest::prelude::*;
use std::collections::HashSet;

const WORDS: &[&str] = &["Software", "Engineer", "Data", "Chef", "Nurse", "Senior", "Analyst"];

fn title_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(WORDS), 1..=3).prop_map(|words| words.join(" "))
}

#[test]
fn test_normalize_skill_name() {
    assert_eq!(normalize_skill_name("python"), "Python");
    assert_eq!(normalize_skill_name("PYTHON"), "Python");
    assert_eq!(normalize_skill_name("sql"), "Sql");
    assert_eq!(normalize_skill_name(""), "");
}

#[test]
fn test_title_query_shapes() {
    assert_eq!(title_query("Data Analyst"), TitleQuery::Partial(["Data", "Analyst"]));
    assert_eq!(title_query("Nurse"), TitleQuery::Exact("Nurse"));
    assert_eq!(
        title_query("Senior Data Analyst"),
        TitleQuery::Exact("Senior Data Analyst")
    );
}

#[test]
fn test_rarity_points_bounds() {
    assert_eq!(skill_rarity_points(0, 0), 0.0);
    assert!((skill_rarity_points(70, 100) - 30.0).abs() < 1e-9);
    assert!((skill_rarity_points(1, 100) - 99.0).abs() < 1e-9);
}

proptest! {
    #[test]
    fn prop_combine_prefers_intersection(
        a in prop::collection::hash_set(0i64..40, 0..20),
        b in prop::collection::hash_set(0i64..40, 0..20),
    ) {
        let combined: HashSet<CandidateId> = combine_candidates(&a, &b).into_iter().collect();
        let both: HashSet<CandidateId> = a.intersection(&b).copied().collect();

        if both.is_empty() {
            let either: HashSet<CandidateId> = a.union(&b).copied().collect();
            prop_assert_eq!(combined, either);
        } else {
            prop_assert_eq!(combined, both);
        }
    }

    #[test]
    fn prop_combine_is_sorted(
        a in prop::collection::hash_set(0i64..40, 0..20),
        b in prop::collection::hash_set(0i64..40, 0..20),
    ) {
        let ordered: Vec<CandidateId> = combine_candidates(&a, &b).into_iter().collect();
        prop_assert!(ordered.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn prop_title_matching(
        job_title in title_strategy(),
        candidate_titles in prop::collection::vec(title_strategy(), 0..12),
    ) {
        let store = InMemoryStore::new();
        let (job_id, ids) = tokio_test::block_on(async {
            let job_id = store.add_job(&job_title, JobStatus::Opened, "Rust").await;
            let mut ids = Vec::new();
            for title in &candidate_titles {
                ids.push(store.add_candidate(title, &[]).await);
            }
            (job_id, ids)
        });

        let matched = tokio_test::block_on(match_by_title(&store, job_id)).unwrap();

        let expected: HashSet<CandidateId> = ids
            .iter()
            .zip(&candidate_titles)
            .filter(|(_, title)| match title_query(&job_title) {
                TitleQuery::Partial(tokens) => tokens
                    .iter()
                    .any(|t| title.to_lowercase().contains(&t.to_lowercase())),
                TitleQuery::Exact(exact) => title.as_str() == exact,
            })
            .map(|(id, _)| *id)
            .collect();

        prop_assert_eq!(matched, expected);
    }

    #[test]
    fn prop_global_filter_drops_every_judged_candidate(
        judged in prop::collection::vec(any::<bool>(), 1..15),
    ) {
        let store = InMemoryStore::new();
        let (job_id, ids) = tokio_test::block_on(async {
            let job_id = store.add_job("Chef", JobStatus::Opened, "Cooking").await;
            let other_job = store.add_job("Baker", JobStatus::Opened, "Baking").await;
            let mut ids = Vec::new();
            for (i, &has_opinion) in judged.iter().enumerate() {
                let id = store.add_candidate("Chef", &[]).await;
                if has_opinion {
                    let kind = if i % 2 == 0 { OpinionKind::Like } else { OpinionKind::Dislike };
                    store.insert_opinion(id, other_job, kind).await;
                }
                ids.push(id);
            }
            (job_id, ids)
        });

        let remaining = tokio_test::block_on(filter_by_opinions(
            &store,
            ids.iter().copied(),
            job_id,
            OpinionScope::Global,
        ))
        .unwrap();

        let expected: Vec<CandidateId> = ids
            .iter()
            .zip(&judged)
            .filter(|&(_, &has_opinion)| !has_opinion)
            .map(|(id, _)| *id)
            .collect();

        prop_assert_eq!(remaining, expected);
    }
}
