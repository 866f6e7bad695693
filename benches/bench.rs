// Criterion benchmarks for the candidate matcher

use candidate_matcher::core::{
    combine_candidates, CandidateFinder, RankingContext, RankingStrategy, SkillRarityRanker,
};
use candidate_matcher::models::{CandidateId, Job, JobStatus, OpinionKind, OpinionScope};
use candidate_matcher::services::{CandidateRepository, InMemoryStore};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::collections::HashSet;
use std::sync::Arc;

const TITLES: &[&str] = &[
    "Software Engineer",
    "Software Developer",
    "Data Engineer",
    "Data Analyst",
    "Product Manager",
    "Chef",
];

/// Store with `count` candidates spread over a handful of titles and skills,
/// one open job and a sprinkling of opinions
fn populated_store(count: usize) -> (InMemoryStore, Job) {
    let store = InMemoryStore::new();

    let job = tokio_test::block_on(async {
        let skills = [
            store.add_skill("Python").await,
            store.add_skill("Java").await,
            store.add_skill("Sql").await,
        ];
        let other_job = store.add_job("Data Analyst", JobStatus::Opened, "Sql").await;

        for i in 0..count {
            let id = store
                .add_candidate(TITLES[i % TITLES.len()], &[skills[i % skills.len()]])
                .await;
            if i % 7 == 0 {
                store.insert_opinion(id, other_job, OpinionKind::Dislike).await;
            }
        }

        let job_id = store
            .add_job("Software Engineer", JobStatus::Opened, "python")
            .await;
        store.get_job(job_id).await
    });

    match job {
        Ok(job) => (store, job),
        Err(e) => panic!("benchmark job missing: {}", e),
    }
}

fn bench_combine(c: &mut Criterion) {
    let mut group = c.benchmark_group("combine_candidates");

    for size in [100, 1000, 10000].iter() {
        let by_title: HashSet<CandidateId> = (0..*size as i64).collect();
        let by_skill: HashSet<CandidateId> = (*size as i64 / 2..*size as i64 * 2).collect();

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| combine_candidates(black_box(&by_title), black_box(&by_skill)))
        });
    }

    group.finish();
}

fn bench_rarity_ranking(c: &mut Criterion) {
    let mut group = c.benchmark_group("skill_rarity_rank");
    let job = Job {
        job_id: 1,
        title: "Software Engineer".to_string(),
        status: JobStatus::Opened,
        skill: "Python".to_string(),
    };

    for size in [100, 1000, 10000].iter() {
        let candidates: Vec<CandidateId> = (0..*size as i64).rev().collect();
        let holders: HashSet<CandidateId> = (0..*size as i64).step_by(3).collect();
        let context = RankingContext {
            skill_holders: &holders,
            population: *size,
        };

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| SkillRarityRanker.rank(black_box(candidates.clone()), &job, &context))
        });
    }

    group.finish();
}

fn bench_find_candidates(c: &mut Criterion) {
    let mut group = c.benchmark_group("find_candidates");
    group.sample_size(20);

    for size in [100, 1000].iter() {
        let (store, job) = populated_store(*size);
        let finder = CandidateFinder::new(Arc::new(SkillRarityRanker), OpinionScope::Global);

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| tokio_test::block_on(finder.find_candidates(&store, black_box(&job))))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_combine,
    bench_rarity_ranking,
    bench_find_candidates
);
criterion_main!(benches);
