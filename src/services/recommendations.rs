use crate::{
    context::MovieContext,
    models::{MovieId, Recommendation},
    services::lookup,
};

/// A ranked candidate; the score never leaves the engine
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct ScoredMatch {
    pub id: MovieId,
    pub score: f64,
}

/// Recommends up to `top_n` movies most similar to `title`
///
/// The title is resolved case-insensitively on its trimmed form. A blank or
/// unknown title yields an empty list. The queried movie never appears in its
/// own results.
pub fn recommend(context: &MovieContext, title: &str, top_n: usize) -> Vec<Recommendation> {
    let Some(query) = lookup::by_title(context, title) else {
        tracing::debug!(title = %title.trim(), "No catalog match for recommendation query");
        return Vec::new();
    };

    let matches = rank(context, query.id, top_n);

    tracing::debug!(
        query_id = %query.id,
        results = matches.len(),
        top_score = matches.first().map(|m| m.score),
        "Recommendations ranked"
    );

    matches
        .iter()
        .filter_map(|m| lookup::by_id(context, m.id))
        .map(Recommendation::from)
        .collect()
}

/// Scores every movie against `query` and keeps the best `top_n`
///
/// Ordered by score descending, ties broken by lower id.
pub(crate) fn rank(context: &MovieContext, query: MovieId, top_n: usize) -> Vec<ScoredMatch> {
    if top_n == 0 {
        return Vec::new();
    }
    let Some(mut scores) = context.index().similarities(query.index()) else {
        return Vec::new();
    };
    scores[query.index()] = f64::NEG_INFINITY;

    let mut matches: Vec<ScoredMatch> = scores
        .into_iter()
        .enumerate()
        .filter(|&(doc, _)| doc != query.index())
        .map(|(doc, score)| ScoredMatch {
            id: MovieId(doc),
            score,
        })
        .collect();

    let by_rank = |a: &ScoredMatch, b: &ScoredMatch| {
        b.score.total_cmp(&a.score).then_with(|| a.id.cmp(&b.id))
    };
    if matches.len() > top_n {
        matches.select_nth_unstable_by(top_n - 1, by_rank);
        matches.truncate(top_n);
    }
    matches.sort_by(by_rank);
    matches
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;

    fn context(json: &str) -> MovieContext {
        MovieContext::new(Catalog::from_json_str(json).unwrap())
    }

    fn sample() -> MovieContext {
        context(
            r#"[
                {"title": "Inception", "genres": "[{'id': 28, 'name': 'Action'}]",
                 "overview": "A thief steals secrets through dream sharing", "keywords": "dream heist"},
                {"title": "Paprika", "genres": "[{'id': 16, 'name': 'Animation'}]",
                 "overview": "A device lets therapists enter dream worlds", "keywords": "dream"},
                {"title": "Heat", "genres": "[{'id': 80, 'name': 'Crime'}]",
                 "overview": "A thief and a detective clash in a heist", "keywords": "heist bank"},
                {"title": "Finding Nemo", "genres": "[{'id': 16, 'name': 'Animation'}]",
                 "overview": "A clownfish searches the ocean for his son", "keywords": "ocean fish"},
                {"title": "Ratatouille", "genres": "[{'id': 16, 'name': 'Animation'}]",
                 "overview": "A rat cooks in Paris", "keywords": "cooking"}
            ]"#,
        )
    }

    fn ids(recs: &[Recommendation]) -> Vec<usize> {
        recs.iter().map(|r| r.id.index()).collect()
    }

    #[test]
    fn test_never_recommends_itself() {
        let context = sample();
        for movie in context.catalog().movies() {
            let recs = recommend(&context, &movie.title, 10);
            assert!(!recs.iter().any(|r| r.id == movie.id));
            assert_eq!(recs.len(), context.catalog().len() - 1);
        }
    }

    #[test]
    fn test_respects_top_n() {
        let context = sample();
        assert_eq!(recommend(&context, "Inception", 2).len(), 2);
        assert!(recommend(&context, "Inception", 0).is_empty());
        assert_eq!(recommend(&context, "Inception", 100).len(), 4);
    }

    #[test]
    fn test_blank_or_unknown_title_is_empty() {
        let context = sample();
        assert!(recommend(&context, "", 10).is_empty());
        assert!(recommend(&context, "   ", 10).is_empty());
        assert!(recommend(&context, "Nonexistent Title XYZ", 10).is_empty());
    }

    #[test]
    fn test_title_match_is_case_insensitive() {
        let context = sample();
        assert_eq!(
            recommend(&context, "Inception", 10),
            recommend(&context, "INCEPTION", 10)
        );
        assert_eq!(
            recommend(&context, "Inception", 10),
            recommend(&context, "  inception  ", 10)
        );
    }

    #[test]
    fn test_repeated_calls_are_identical() {
        let context = sample();
        let first = recommend(&context, "Heat", 3);
        let second = recommend(&context, "Heat", 3);
        assert_eq!(first, second);
    }

    #[test]
    fn test_ranks_related_movies_first() {
        let context = sample();
        let recs = recommend(&context, "Inception", 10);
        // Paprika and Heat share terms with Inception, the others share none
        assert_eq!(&ids(&recs)[..2], &[1, 2]);
        assert_eq!(recs[0].title, "Paprika");
    }

    #[test]
    fn test_shared_text_ranks_above_unrelated() {
        let context = context(
            r#"[
                {"title": "Nebula", "overview": "starship crew explores nebula"},
                {"title": "Nebula", "overview": "starship crew explores nebula"},
                {"title": "Harvest", "overview": "farmers gather wheat"}
            ]"#,
        );
        let recs = recommend(&context, "Nebula", 10);
        assert_eq!(ids(&recs), vec![1, 2]);
    }

    #[test]
    fn test_ties_break_by_lower_id() {
        let context = context(
            r#"[
                {"title": "Query", "overview": "lighthouse keeper"},
                {"title": "Zeta", "overview": "desert caravan"},
                {"title": "Alpha", "overview": "mountain monastery"},
                {"title": "Beta", "overview": "river barge"}
            ]"#,
        );
        assert_eq!(ids(&recommend(&context, "Query", 10)), vec![1, 2, 3]);
        assert_eq!(ids(&recommend(&context, "Query", 2)), vec![1, 2]);
    }

    #[test]
    fn test_malformed_genres_stay_queryable() {
        let context = context(
            r#"[
                {"title": "Broken", "genres": "[{'name': 'Western'", "overview": "gunslinger town"},
                {"title": "Missing", "genres": "[{'id': 37}]", "overview": "gunslinger duel"},
                {"title": "Other", "genres": "Comedy|Romance", "overview": "wedding planner"}
            ]"#,
        );
        assert_eq!(ids(&recommend(&context, "Broken", 10)), vec![1, 2]);
        assert_eq!(ids(&recommend(&context, "Missing", 10)), vec![0, 2]);
    }

    #[test]
    fn test_degenerate_corpus() {
        let context = context(r#"[{"title": "The"}, {"title": "A"}, {"title": "Of"}]"#);
        assert_eq!(ids(&recommend(&context, "The", 10)), vec![1, 2]);
    }

    #[test]
    fn test_shared_context_across_threads() {
        let context = std::sync::Arc::new(sample());
        let expected = recommend(&context, "Inception", 3);

        let results: Vec<Vec<Recommendation>> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| {
                    let context = std::sync::Arc::clone(&context);
                    scope.spawn(move || recommend(&context, "Inception", 3))
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(results.len(), 8);
        assert!(results.iter().all(|recs| *recs == expected));
    }

    #[test]
    fn test_rank_scores_are_descending() {
        let context = sample();
        let matches = rank(&context, MovieId(0), 10);
        assert!(matches.windows(2).all(|w| w[0].score >= w[1].score));
        assert!(matches.iter().all(|m| m.score.is_finite()));
    }
}
