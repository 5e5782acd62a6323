use criterion::{black_box, criterion_group, criterion_main, Criterion};
use ngram_vectorizer::{
    all_ngrams, embed_corpus, fit_embedding_vocabulary, ngrams, reduce_dimensionality,
    AllNgramsOptions, EmbeddingOptions, NgramOptions,
};

const AFFILIATIONS: [&str; 8] = [
    "Université Le Havre Normandie, Équipe de Recherche",
    "Normandie Univ, UNILEHAVRE, FR 3038 CNRS, URCOM, 76600 Le Havre, France",
    "URCOM - Unité de Recherche en Chimie Organique",
    "Laboratoire de Mathématiques Appliquées du Havre",
    "Institut de Chimie Organique Fine, Rouen",
    "CNRS UMR 6614 CORIA, Université de Rouen",
    "Laboratoire d'Informatique, de Traitement de l'Information et des Systèmes",
    "Université de Caen Normandie, GREYC",
];

fn corpus() -> Vec<String> {
    // 64 documents
    (0..8)
        .flat_map(|i| AFFILIATIONS.iter().map(move |a| format!("{a} {i}")))
        .collect()
}

fn ngram_benchmark(c: &mut Criterion) {
    let text = AFFILIATIONS[1];
    c.bench_function("ngrams_3", |b| {
        b.iter(|| ngrams(black_box(text), 3, &NgramOptions::default()))
    });
    c.bench_function("all_ngrams_2_8", |b| {
        b.iter(|| all_ngrams(black_box(text), &AllNgramsOptions::range(2, 8)))
    });
}

fn embedding_benchmark(c: &mut Criterion) {
    let docs = corpus();
    let opts = EmbeddingOptions::default();
    c.bench_function("fit_embedding_vocabulary", |b| {
        b.iter(|| fit_embedding_vocabulary(black_box(&docs), &opts))
    });
    let vocab = fit_embedding_vocabulary(&docs, &opts);
    c.bench_function("embed_corpus", |b| {
        b.iter(|| embed_corpus(black_box(&docs), &vocab, &opts))
    });
}

fn topic_benchmark(c: &mut Criterion) {
    let docs = corpus();
    let opts = AllNgramsOptions::range(2, 4);
    c.bench_function("reduce_dimensionality_4_topics", |b| {
        b.iter(|| reduce_dimensionality(black_box(&docs), 4, &opts))
    });
}

criterion_group!(benches, ngram_benchmark, embedding_benchmark, topic_benchmark);
criterion_main!(benches);
