use ngram_vectorizer::vectorizer::topic::{
    dominant_documents_for_topic, dominant_topics_for_document,
};
use ngram_vectorizer::{
    cosine, embed_corpus, embed_text, fit_embedding_vocabulary, fit_vocabulary,
    group_by_dominant_topic, reduce_dimensionality, AllNgramsOptions, EmbeddingOptions,
    Vocabulary, VocabularyOptions,
};

const ANIMALS: [&str; 3] = [
    "Le chat est un animal domestique.",
    "Le chien est un animal domestique.",
    "Le perroquet est un oiseau coloré.",
];

#[test]
fn similar_documents_share_a_topic() {
    let model = reduce_dimensionality(&ANIMALS, 2, &AllNgramsOptions::range(2, 8)).unwrap();
    assert_eq!(model.doc_topic.shape(), (3, 2));
    assert_eq!(model.topic_term.shape(), (2, model.vocabulary.len()));

    let t0 = dominant_topics_for_document(&model.doc_topic, 0).unwrap();
    let t1 = dominant_topics_for_document(&model.doc_topic, 1).unwrap();
    let t2 = dominant_topics_for_document(&model.doc_topic, 2).unwrap();
    assert!(t0.iter().any(|t| t1.contains(t)), "{t0:?} {t1:?}");
    assert!(!t2.iter().any(|t| t0.contains(t)), "{t0:?} {t2:?}");

    let picked = model.dominant_topic_for_document(0).unwrap();
    assert!(t0.contains(&picked));
    let docs = model.documents_for_dominant_topic(picked, &ANIMALS).unwrap();
    assert!(docs.contains(&ANIMALS[0]));
    assert!(!docs.contains(&ANIMALS[2]));
}

#[test]
fn groups_cover_the_corpus() {
    let model = reduce_dimensionality(&ANIMALS, 2, &AllNgramsOptions::range(2, 8)).unwrap();
    let groups = group_by_dominant_topic(&model.doc_topic, &ANIMALS).unwrap();
    assert_eq!(groups.len(), 2);
    for (topic, group) in groups.iter().enumerate() {
        assert_eq!(group.topic, topic);
        let reps = dominant_documents_for_topic(&model.doc_topic, topic).unwrap();
        assert!(reps.contains(&group.representative));
        assert_eq!(group.label, ANIMALS[group.representative]);
    }
    let mut all: Vec<&str> = groups
        .iter()
        .flat_map(|g| g.documents.iter().map(String::as_str))
        .collect();
    all.sort_unstable();
    let mut expected = ANIMALS.to_vec();
    expected.sort_unstable();
    assert_eq!(all, expected);
}

#[test]
fn model_queries_reject_bad_indices() {
    let model = reduce_dimensionality(&ANIMALS, 2, &AllNgramsOptions::range(2, 4)).unwrap();
    assert!(model.dominant_topic_for_document(3).is_err());
    assert!(model.dominant_document_for_topic(2).is_err());
    assert!(model.top_terms(0, 5).unwrap().len() == 5);
}

#[test]
fn empty_corpus_gives_empty_model() {
    let corpus: [&str; 0] = [];
    let model = reduce_dimensionality(&corpus, 3, &AllNgramsOptions::default()).unwrap();
    assert!(model.is_empty());
    assert!(model.topic_term.is_empty());
    assert!(model.vocabulary.is_empty());
}

#[test]
fn embeddings_follow_vocabulary_dimensions() {
    let opts = EmbeddingOptions::default();
    let vocab = fit_embedding_vocabulary(&ANIMALS, &opts);
    let embs = embed_corpus(&ANIMALS, &vocab, &opts);
    assert_eq!(embs.len(), ANIMALS.len());
    assert!(embs.iter().all(|e| e.len() == vocab.len()));
    assert!(cosine(&embs[0], &embs[1]) > cosine(&embs[0], &embs[2]));

    // unseen text keeps the same dimensions
    let query = embed_text("un chat domestique", &vocab, &opts);
    assert_eq!(query.len(), vocab.len());
    assert!(cosine(&query, &embs[0]) > cosine(&query, &embs[2]));
}

#[test]
fn fitted_vocabulary_drops_rare_tokens() {
    let opts = VocabularyOptions {
        n: 3,
        min_count: 2,
        ..VocabularyOptions::default()
    };
    let vocab = fit_vocabulary(&ANIMALS, &opts);
    // "est" and "domestique": 5 occurrences
    assert_eq!(vocab.token_at(0), Some("est"));
    assert!(vocab.contains("lec"));
    // only in the parrot sentence
    assert!(!vocab.contains("oqu"));
}

#[test]
fn persisted_vocabulary_gives_identical_embeddings() {
    let opts = EmbeddingOptions::default();
    let vocab = fit_embedding_vocabulary(&ANIMALS, &opts);
    let restored = Vocabulary::from_cbor(&vocab.to_cbor().unwrap()).unwrap();
    for doc in ANIMALS {
        assert_eq!(embed_text(doc, &vocab, &opts), embed_text(doc, &restored, &opts));
    }
}
