// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use chrono::{Duration, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::errors::StoreError;
use crate::observability::messages::store::RetentionCleanup;
use crate::observability::messages::StructuredLog;
use crate::token::Token;
use crate::traits::{TokenQuery, TokenStore};

/// Token store backed by a map behind a tokio `RwLock`.
///
/// Saving a token with an id already present replaces the stored copy, so the
/// store always holds the latest snapshot of each token. Listings come back
/// oldest first.
#[derive(Debug, Default)]
pub struct InMemoryTokenStore {
    tokens: RwLock<HashMap<Uuid, Token>>,
}

impl InMemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.tokens.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.tokens.read().await.is_empty()
    }
}

fn oldest_first(mut tokens: Vec<Token>) -> Vec<Token> {
    tokens.sort_by_key(|t| t.metadata.created_at);
    tokens
}

#[async_trait]
impl TokenStore for InMemoryTokenStore {
    async fn save(&self, token: &Token) -> Result<(), StoreError> {
        self.tokens.write().await.insert(token.id(), token.clone());
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Token>, StoreError> {
        Ok(self.tokens.read().await.get(&id).cloned())
    }

    async fn get_by_correlation_id(&self, correlation_id: &str) -> Result<Vec<Token>, StoreError> {
        let tokens = self.tokens.read().await;
        Ok(oldest_first(
            tokens
                .values()
                .filter(|t| t.correlation_id() == correlation_id)
                .cloned()
                .collect(),
        ))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        Ok(self.tokens.write().await.remove(&id).is_some())
    }

    async fn save_all(&self, tokens: &[Token]) -> Result<(), StoreError> {
        let mut map = self.tokens.write().await;
        for token in tokens {
            map.insert(token.id(), token.clone());
        }
        Ok(())
    }

    async fn get_all(&self) -> Result<Vec<Token>, StoreError> {
        Ok(oldest_first(self.tokens.read().await.values().cloned().collect()))
    }

    async fn clear(&self) -> Result<(), StoreError> {
        self.tokens.write().await.clear();
        Ok(())
    }

    /// Drops tokens not updated within the last `retention_days` days.
    async fn cleanup(&self, retention_days: u32) -> Result<usize, StoreError> {
        let cutoff = Utc::now() - Duration::days(i64::from(retention_days));
        let mut map = self.tokens.write().await;
        let before = map.len();
        map.retain(|_, t| t.metadata.updated_at >= cutoff);
        let removed = before - map.len();

        RetentionCleanup {
            removed,
            retention_days,
        }
        .log();
        Ok(removed)
    }

    async fn query(&self, filter: &TokenQuery) -> Result<Vec<Token>, StoreError> {
        let tokens = self.tokens.read().await;
        let matched = oldest_first(tokens.values().filter(|t| filter.matches(t)).cloned().collect());
        Ok(match filter.limit {
            Some(limit) => matched.into_iter().take(limit).collect(),
            None => matched,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::TokenColor;
    use serde_json::json;

    fn token(correlation: &str, color: TokenColor) -> Token {
        Token::new(json!({}), color).with_correlation_id(correlation)
    }

    #[tokio::test]
    async fn test_save_replaces_by_id() {
        let store = InMemoryTokenStore::new();
        let mut t = token("c1", TokenColor::Pending);
        store.save(&t).await.unwrap();

        t.color = TokenColor::Committed;
        store.save(&t).await.unwrap();

        assert_eq!(store.len().await, 1);
        assert_eq!(store.get(t.id()).await.unwrap().unwrap().color, TokenColor::Committed);
    }

    #[tokio::test]
    async fn test_correlation_lookup_and_delete() {
        let store = InMemoryTokenStore::new();
        let a = token("c1", TokenColor::Pending);
        let b = token("c1", TokenColor::Invalid);
        let c = token("c2", TokenColor::Pending);
        store.save_all(&[a.clone(), b.clone(), c.clone()]).await.unwrap();

        assert_eq!(store.get_by_correlation_id("c1").await.unwrap().len(), 2);
        assert!(store.delete(a.id()).await.unwrap());
        assert!(!store.delete(a.id()).await.unwrap());
        assert_eq!(store.get_all().await.unwrap().len(), 2);

        store.clear().await.unwrap();
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_query_filters_and_limits() {
        let store = InMemoryTokenStore::new();
        for _ in 0..3 {
            store.save(&token("c1", TokenColor::Rejected)).await.unwrap();
        }
        store.save(&token("c1", TokenColor::Committed)).await.unwrap();

        let rejected = store
            .query(&TokenQuery::default().with_color(TokenColor::Rejected))
            .await
            .unwrap();
        assert_eq!(rejected.len(), 3);

        let limited = store
            .query(&TokenQuery::default().for_correlation("c1").limit(2))
            .await
            .unwrap();
        assert_eq!(limited.len(), 2);
    }

    #[tokio::test]
    async fn test_cleanup_removes_only_stale_tokens() {
        let store = InMemoryTokenStore::new();
        let fresh = token("fresh", TokenColor::Pending);
        let mut stale = token("stale", TokenColor::Pending);
        stale.metadata.updated_at = Utc::now() - Duration::days(45);
        store.save_all(&[fresh.clone(), stale]).await.unwrap();

        assert_eq!(store.cleanup(30).await.unwrap(), 1);
        assert!(store.get(fresh.id()).await.unwrap().is_some());
        assert_eq!(store.len().await, 1);
    }
}
