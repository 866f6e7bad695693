// Integration tests for the matching pipeline

use candidate_matcher::core::{CandidateFinder, MatchStage, SkillRarityRanker};
use candidate_matcher::models::{CandidateId, Job, JobStatus, OpinionKind, OpinionScope};
use candidate_matcher::services::{CandidateRepository, InMemoryStore};
use std::sync::Arc;

struct Fixture {
    store: InMemoryStore,
    job: Job,
    c1: CandidateId,
    c2: CandidateId,
}

/// Job{"Software Engineer", "Python"}, C1{"Software Developer", [Python]},
/// C2{"Software Engineer", [Java]}
async fn software_engineer_fixture() -> Fixture {
    let store = InMemoryStore::new();
    let python = store.add_skill("Python").await;
    let java = store.add_skill("Java").await;
    let c1 = store.add_candidate("Software Developer", &[python]).await;
    let c2 = store.add_candidate("Software Engineer", &[java]).await;
    let job_id = store
        .add_job("Software Engineer", JobStatus::Opened, "Python")
        .await;
    let job = store.get_job(job_id).await.unwrap();

    Fixture { store, job, c1, c2 }
}

#[tokio::test]
async fn test_integration_end_to_end_matching() {
    let Fixture { store, job, c1, c2 } = software_engineer_fixture().await;
    let finder = CandidateFinder::default();

    // Both titles contain "Software"
    let by_title = candidate_matcher::core::match_by_title(&store, job.job_id)
        .await
        .unwrap();
    assert!(by_title.contains(&c1));
    assert!(by_title.contains(&c2));

    let by_skill = candidate_matcher::core::match_by_skill(&store, &job.skill)
        .await
        .unwrap();
    assert_eq!(by_skill.into_iter().collect::<Vec<_>>(), vec![c1]);

    let result = finder.find_candidates(&store, &job).await;
    assert_eq!(result, vec![c1]);

    let matches = store.matches().await;
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].candidate_id, c1);
    assert_eq!(matches[0].job_id, job.job_id);
}

#[tokio::test]
async fn test_dislike_on_other_job_excludes_candidate() {
    let Fixture { store, job, c1, .. } = software_engineer_fixture().await;
    let other_job = store.add_job("Data Analyst", JobStatus::Opened, "Sql").await;
    store.insert_opinion(c1, other_job, OpinionKind::Dislike).await;

    let result = CandidateFinder::default().find_candidates(&store, &job).await;

    assert!(result.is_empty());
    assert!(store.matches().await.is_empty());
}

#[tokio::test]
async fn test_repeated_runs_duplicate_match_rows() {
    let Fixture { store, job, c1, .. } = software_engineer_fixture().await;
    let finder = CandidateFinder::default();

    let first = finder.find_candidates(&store, &job).await;
    let second = finder.find_candidates(&store, &job).await;

    assert_eq!(first, second);
    let matches = store.matches().await;
    assert_eq!(matches.len(), 2);
    assert!(matches.iter().all(|m| m.candidate_id == c1 && m.job_id == job.job_id));
}

#[tokio::test]
async fn test_unknown_skill_fails_closed() {
    let Fixture { store, mut job, .. } = software_engineer_fixture().await;
    job.skill = "haskell".to_string();
    let finder = CandidateFinder::default();

    assert!(finder.find_candidates(&store, &job).await.is_empty());
    assert!(store.matches().await.is_empty());

    let err = finder.try_find_candidates(&store, &job).await.unwrap_err();
    assert_eq!(err.stage, MatchStage::Skill);
    assert_eq!(err.kind(), "not_found");
}

#[tokio::test]
async fn test_skill_name_is_normalized() {
    let Fixture { store, mut job, c1, .. } = software_engineer_fixture().await;
    job.skill = "pYtHoN".to_string();

    let result = CandidateFinder::default().find_candidates(&store, &job).await;
    assert_eq!(result, vec![c1]);
}

#[tokio::test]
async fn test_single_word_title_requires_exact_match() {
    let store = InMemoryStore::new();
    let knives = store.add_skill("Knives").await;
    let chef = store.add_candidate("Chef", &[]).await;
    store.add_candidate("Chef de Partie", &[]).await;
    store.add_candidate("chef", &[]).await;
    let job_id = store.add_job("Chef", JobStatus::Opened, "knives").await;
    let job = store.get_job(job_id).await.unwrap();

    // Title matches only the exact "Chef"; nobody holds the skill so the union is used
    let result = CandidateFinder::default().find_candidates(&store, &job).await;
    assert_eq!(result, vec![chef]);

    // Once a candidate holds the skill without the title, the union grows
    let sous = store.add_candidate("Sous Chef", &[knives]).await;
    let result = CandidateFinder::default().find_candidates(&store, &job).await;
    assert_eq!(result, vec![chef, sous]);
}

#[tokio::test]
async fn test_no_candidates_writes_nothing() {
    let store = InMemoryStore::new();
    store.add_skill("Welding").await;
    store.add_candidate("Accountant", &[]).await;
    let job_id = store.add_job("Welder", JobStatus::Opened, "welding").await;
    let job = store.get_job(job_id).await.unwrap();

    let result = CandidateFinder::default().find_candidates(&store, &job).await;

    assert!(result.is_empty());
    assert!(store.matches().await.is_empty());
}

#[tokio::test]
async fn test_rarity_ranking_orders_union() {
    let store = InMemoryStore::new();
    let cobol = store.add_skill("Cobol").await;
    let java = store.add_skill("Java").await;
    let operator = store.add_candidate("Mainframe Operator", &[java]).await;
    let accountant = store.add_candidate("Accountant", &[cobol]).await;
    let tester = store.add_candidate("Mainframe Tester", &[java]).await;
    for _ in 0..5 {
        store.add_candidate("Web Developer", &[java]).await;
    }
    let job_id = store
        .add_job("Mainframe Programmer", JobStatus::Opened, "cobol")
        .await;
    let job = store.get_job(job_id).await.unwrap();

    let finder = CandidateFinder::new(Arc::new(SkillRarityRanker), OpinionScope::Global);
    let result = finder.find_candidates(&store, &job).await;

    assert_eq!(result, vec![accountant, operator, tester]);
}
