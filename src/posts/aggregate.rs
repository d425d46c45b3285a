//! Fan-out aggregation of posts with their comments
//!
//! One comment lookup per post, at most `fan_out_limit` in flight. Results are
//! collected in post order whatever order the lookups finish in, and the
//! listing is only produced once every lookup has settled.

use crate::common::config::AggregationPolicy;
use crate::common::{Comment, Error, Post, PostWithComments, Result};
use async_trait::async_trait;
use futures_util::{stream, StreamExt, TryStreamExt};
use std::sync::Arc;

/// Source of the comments attached to one post
#[async_trait]
pub trait CommentSource: Send + Sync {
    async fn comments_for_post(&self, post_id: &str) -> Result<Vec<Comment>>;
}

pub struct Aggregator {
    source: Arc<dyn CommentSource>,
    fan_out_limit: usize,
    policy: AggregationPolicy,
}

impl Aggregator {
    pub fn new(source: Arc<dyn CommentSource>, fan_out_limit: usize, policy: AggregationPolicy) -> Self {
        Self {
            source,
            fan_out_limit: fan_out_limit.max(1),
            policy,
        }
    }

    pub async fn enrich(&self, posts: Vec<Post>) -> Result<Vec<PostWithComments>> {
        tracing::debug!(
            posts = posts.len(),
            limit = self.fan_out_limit,
            "Fetching comments for posts"
        );
        stream::iter(posts)
            .map(|post| self.enrich_one(post))
            .buffered(self.fan_out_limit)
            .try_collect()
            .await
    }

    async fn enrich_one(&self, post: Post) -> Result<PostWithComments> {
        match self.source.comments_for_post(&post.id).await {
            Ok(comments) => Ok(post.with_comments(Some(comments))),
            // Only transient sibling failures degrade; configuration faults still fail.
            Err(e @ Error::Upstream { .. }) if self.policy == AggregationPolicy::Degrade => {
                tracing::warn!(post_id = %post.id, "Comments unavailable: {}", e);
                Ok(post.with_comments(None))
            }
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::Document;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Answers after a per-post delay; posts listed in `failing` error out.
    #[derive(Default)]
    struct FakeSource {
        comments: HashMap<String, Vec<Comment>>,
        delays_ms: HashMap<String, u64>,
        failing: Vec<String>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl CommentSource for FakeSource {
        async fn comments_for_post(&self, post_id: &str) -> Result<Vec<Comment>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(ms) = self.delays_ms.get(post_id) {
                tokio::time::sleep(Duration::from_millis(*ms)).await;
            }
            if self.failing.iter().any(|id| id == post_id) {
                return Err(Error::upstream("comments", "connection refused"));
            }
            Ok(self.comments.get(post_id).cloned().unwrap_or_default())
        }
    }

    fn post(id: &str) -> Post {
        Post {
            id: id.into(),
            title: format!("title {}", id),
            description: "d".into(),
            extra: Document::new(),
        }
    }

    fn comment(id: &str, post_id: &str) -> Comment {
        Comment {
            id: id.into(),
            post_id: post_id.into(),
            message: "hi".into(),
            extra: Document::new(),
        }
    }

    #[tokio::test]
    async fn test_order_follows_posts_not_completion() {
        let mut source = FakeSource::default();
        source.delays_ms.insert("p1".into(), 60);
        source.delays_ms.insert("p2".into(), 30);
        source.delays_ms.insert("p3".into(), 0);
        source.comments.insert("p2".into(), vec![comment("c1", "p2")]);

        let aggregator = Aggregator::new(Arc::new(source), 8, AggregationPolicy::FailFast);
        let listed = aggregator
            .enrich(vec![post("p1"), post("p2"), post("p3")])
            .await
            .unwrap();

        let ids: Vec<_> = listed.iter().map(|p| p.post.id.as_str()).collect();
        assert_eq!(ids, vec!["p1", "p2", "p3"]);
        assert_eq!(listed[0].comments, Some(vec![]));
        assert_eq!(listed[1].comments, Some(vec![comment("c1", "p2")]));
    }

    #[tokio::test]
    async fn test_fail_fast_fails_whole_listing() {
        let source = FakeSource {
            failing: vec!["p2".into()],
            ..Default::default()
        };
        let aggregator = Aggregator::new(Arc::new(source), 4, AggregationPolicy::FailFast);
        let result = aggregator.enrich(vec![post("p1"), post("p2"), post("p3")]).await;
        assert!(matches!(result, Err(Error::Upstream { .. })));
    }

    #[tokio::test]
    async fn test_degrade_marks_failed_lookup_null() {
        let source = FakeSource {
            failing: vec!["p2".into()],
            ..Default::default()
        };
        let aggregator = Aggregator::new(Arc::new(source), 4, AggregationPolicy::Degrade);
        let listed = aggregator
            .enrich(vec![post("p1"), post("p2"), post("p3")])
            .await
            .unwrap();
        assert_eq!(listed.len(), 3);
        assert_eq!(listed[0].comments, Some(vec![]));
        assert_eq!(listed[1].comments, None);
        assert_eq!(listed[2].comments, Some(vec![]));
    }

    #[tokio::test]
    async fn test_degrade_still_fails_on_missing_peer() {
        struct Unconfigured;

        #[async_trait]
        impl CommentSource for Unconfigured {
            async fn comments_for_post(&self, _post_id: &str) -> Result<Vec<Comment>> {
                Err(Error::PeerNotConfigured("comments not set".into()))
            }
        }

        let aggregator = Aggregator::new(Arc::new(Unconfigured), 4, AggregationPolicy::Degrade);
        let result = aggregator.enrich(vec![post("p1")]).await;
        assert!(matches!(result, Err(Error::PeerNotConfigured(_))));
    }

    #[tokio::test]
    async fn test_one_lookup_per_post_and_empty_listing() {
        let source = Arc::new(FakeSource::default());
        let aggregator = Aggregator::new(source.clone(), 0, AggregationPolicy::FailFast);

        assert!(aggregator.enrich(vec![]).await.unwrap().is_empty());
        assert_eq!(source.calls.load(Ordering::SeqCst), 0);

        let posts = (0..20).map(|i| post(&format!("p{}", i))).collect();
        assert_eq!(aggregator.enrich(posts).await.unwrap().len(), 20);
        assert_eq!(source.calls.load(Ordering::SeqCst), 20);
    }
}
