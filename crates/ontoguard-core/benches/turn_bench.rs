// ─────────────────────────────────────────────────────────────────────
// Ontoguard — Turn Pipeline Benchmarks
// ─────────────────────────────────────────────────────────────────────

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use ontoguard_core::{
    EmbeddingCache, ExternalGeneration, HashEmbedding, TurnAuditor, TurnInput,
};
use ontoguard_metrics::OmegaTrendEstimator;
use ontoguard_types::{
    GovernanceModule, GovernanceModuleState, OntoguardConfig, ReferenceOntology,
};

fn governance() -> Vec<GovernanceModuleState> {
    [
        GovernanceModule::CostObserver,
        GovernanceModule::NormativeRegulator,
        GovernanceModule::SemanticMemory,
        GovernanceModule::AuditIntegrity,
    ]
    .into_iter()
    .map(|module| GovernanceModuleState {
        module,
        active: true,
        effectiveness: 0.9,
    })
    .collect()
}

fn auditor() -> TurnAuditor {
    TurnAuditor::new(
        Arc::new(HashEmbedding::default()),
        Arc::new(ExternalGeneration::new(|_, _| {
            Ok("a corrected response realigned with the stated purpose".to_string())
        })),
        Arc::new(OmegaTrendEstimator::default()),
        OntoguardConfig::default(),
    )
}

fn bench_embedding_cache(c: &mut Criterion) {
    let cache = EmbeddingCache::new(Arc::new(HashEmbedding::default()), true);
    let text = "Purpose: assist the operator. Limits: no speculation. Ethics: candor.";
    cache.preload(text).unwrap();

    c.bench_function("cache_hit_384d", |b| {
        b.iter(|| cache.get(black_box(text)).unwrap())
    });

    let uncached = EmbeddingCache::new(Arc::new(HashEmbedding::default()), false);
    c.bench_function("embed_miss_384d", |b| {
        b.iter(|| uncached.get(black_box(text)).unwrap())
    });
}

fn bench_audit_turn(c: &mut Criterion) {
    let auditor = auditor();
    let ontology = ReferenceOntology::new(
        "assist the operator with project analysis.",
        "no speculation beyond provided data.",
        "candor and traceability.",
    );
    auditor.preload_reference(&ontology).unwrap();
    let governance = governance();

    let candidate =
        "the analysis of the current project state shows steady progress on every tracked front";
    let input = TurnInput {
        session_id: "bench-session",
        turn_index: 1,
        ontology: &ontology,
        user_message: "summarize the project state",
        candidate_response: candidate,
        governance: &governance,
        history: &[],
    };

    c.bench_function("audit_turn_384d", |b| {
        b.iter(|| auditor.audit_turn(black_box(&input)).unwrap())
    });
}

criterion_group!(benches, bench_embedding_cache, bench_audit_turn);
criterion_main!(benches);
