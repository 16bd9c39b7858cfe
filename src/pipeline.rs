//! Per-post orchestration: normalize, translate, classify, persist

use std::sync::Arc;

use tracing::debug;
use tracing::info;
use tracing::warn;

use crate::config::Goal;
use crate::errors::Result;
use crate::ingest::MessageSource;
use crate::ingest::RawPost;
use crate::preprocessing::Normalizer;
use crate::services::EmotionClassifier;
use crate::services::Translator;
use crate::sink::CsvSink;

/// A post after the pipeline ran over it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedPost {
    /// Raw text as a JSON string literal
    pub raw: String,
    pub cleaned: String,
    /// Service response; only present for the sentiment-analysis goal
    pub emotion: Option<String>,
}

impl ProcessedPost {
    pub fn to_record(&self) -> Vec<&str> {
        let mut record = vec![self.raw.as_str(), self.cleaned.as_str()];
        if let Some(emotion) = &self.emotion {
            record.push(emotion);
        }
        record
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    pub processed: u64,
    pub failed: u64,
}

pub struct PostProcessor<T, C> {
    normalizer: Arc<Normalizer>,
    translator: T,
    classifier: C,
    source_lang: String,
    goal: Goal,
}

impl<T: Translator, C: EmotionClassifier> PostProcessor<T, C> {
    pub fn new(
        normalizer: Arc<Normalizer>,
        translator: T,
        classifier: C,
        source_lang: impl Into<String>,
        goal: Goal,
    ) -> Self {
        Self {
            normalizer,
            translator,
            classifier,
            source_lang: source_lang.into(),
            goal,
        }
    }

    pub fn goal(&self) -> Goal {
        self.goal
    }

    /// Normalize the post text, translating it when it is not in the source language
    pub async fn clean(&self, post: &RawPost) -> Result<String> {
        let cleaned = self.normalizer.normalize(&post.text_literal())?;

        if post.lang == self.source_lang {
            return Ok(cleaned);
        }

        debug!("Translating post from {} to {}", post.lang, self.source_lang);
        self.translator
            .translate(&cleaned, &post.lang, &self.source_lang)
            .await
    }

    pub async fn process(&self, payload: &str) -> Result<ProcessedPost> {
        let post = RawPost::from_json(payload)?;
        let cleaned = self.clean(&post).await?;

        let emotion = match self.goal {
            Goal::CollectData => None,
            Goal::SentimentAnalysis => Some(self.classifier.get_emotion(&cleaned).await?),
        };

        Ok(ProcessedPost {
            raw: post.text_literal(),
            cleaned,
            emotion,
        })
    }

    /// Consume `source` until it is exhausted.
    ///
    /// A failing post is logged and skipped; source, table and sink failures end the run.
    pub async fn run<S: MessageSource>(&self, source: &mut S, sink: &mut CsvSink) -> Result<RunStats> {
        let mut stats = RunStats::default();
        info!("Consuming posts ({}) into {}", self.goal, sink.path().display());

        while let Some(payload) = source.next_message().await? {
            match self.process(&payload).await {
                Ok(post) => {
                    if let Some(emotion) = &post.emotion {
                        info!("Emotion: {emotion}");
                    }
                    sink.write_row(&post.to_record())?;
                    stats.processed += 1;
                }
                Err(e) if e.is_configuration() => return Err(e),
                Err(e) => {
                    warn!("Skipping post: {e}");
                    stats.failed += 1;
                }
            }
        }

        info!(
            "Run finished: {} processed, {} failed",
            stats.processed, stats.failed
        );
        Ok(stats)
    }
}
