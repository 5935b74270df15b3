use crate::domain::sentiment::{SentimentLabel, SentimentScorer};
use crate::domain::types::{NewsRecord, ScoredNews};
use std::collections::BTreeMap;
use tracing::info;

/// Scores every record with the given scorer. Records without a headline score 0.
pub fn score_headlines(news: &[NewsRecord], scorer: &dyn SentimentScorer) -> Vec<ScoredNews> {
    let scored: Vec<ScoredNews> = news
        .iter()
        .map(|record| ScoredNews {
            sentiment: record
                .headline
                .as_deref()
                .map(|h| scorer.score(h))
                .unwrap_or(0.0),
            record: record.clone(),
        })
        .collect();

    let labels = label_counts(&scored);
    info!(
        policy = %scorer.policy(),
        headlines = scored.len(),
        positive = labels.get(&SentimentLabel::Positive).copied().unwrap_or(0),
        neutral = labels.get(&SentimentLabel::Neutral).copied().unwrap_or(0),
        negative = labels.get(&SentimentLabel::Negative).copied().unwrap_or(0),
        "Sentiment scoring complete"
    );
    scored
}

pub fn label_counts(scored: &[ScoredNews]) -> BTreeMap<SentimentLabel, usize> {
    let mut counts = BTreeMap::new();
    for s in scored {
        *counts.entry(SentimentLabel::from_score(s.sentiment)).or_insert(0) += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::news::lexical_scorer::LexicalScorer;
    use chrono::NaiveDate;

    fn news(headline: Option<&str>) -> NewsRecord {
        NewsRecord {
            date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            headline: headline.map(str::to_string),
            ticker: "AAPL".to_string(),
            publisher: None,
        }
    }

    #[test]
    fn test_scores_each_record() {
        let input = vec![
            news(Some("positive surprise")),
            news(Some("Negative revisions")),
            news(Some("Flat session")),
            news(None),
        ];
        let scored = score_headlines(&input, &LexicalScorer::new());

        let values: Vec<f64> = scored.iter().map(|s| s.sentiment).collect();
        assert_eq!(values, vec![1.0, -1.0, 0.0, 0.0]);
        assert_eq!(scored[0].record, input[0]);
    }

    #[test]
    fn test_label_counts() {
        let input = vec![
            news(Some("positive")),
            news(Some("positive again")),
            news(None),
        ];
        let counts = label_counts(&score_headlines(&input, &LexicalScorer::new()));
        assert_eq!(counts.get(&SentimentLabel::Positive), Some(&2));
        assert_eq!(counts.get(&SentimentLabel::Neutral), Some(&1));
        assert_eq!(counts.get(&SentimentLabel::Negative), None);
    }
}
