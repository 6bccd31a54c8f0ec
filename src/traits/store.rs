// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::errors::StoreError;
use crate::token::{Token, TokenColor};

/// Filter for [`TokenStore::query`]. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenQuery {
    pub place: Option<String>,
    pub color: Option<TokenColor>,
    pub correlation_id: Option<String>,
    pub created_after: Option<DateTime<Utc>>,
    pub created_before: Option<DateTime<Utc>>,
    pub limit: Option<usize>,
}

impl TokenQuery {
    pub fn in_place(mut self, place: impl Into<String>) -> Self {
        self.place = Some(place.into());
        self
    }

    pub fn with_color(mut self, color: TokenColor) -> Self {
        self.color = Some(color);
        self
    }

    pub fn for_correlation(mut self, correlation_id: impl Into<String>) -> Self {
        self.correlation_id = Some(correlation_id.into());
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Every set field matches. `limit` is applied by the store, not here.
    pub fn matches(&self, token: &Token) -> bool {
        let meta = &token.metadata;
        self.place
            .as_deref()
            .map_or(true, |p| meta.current_place.as_deref() == Some(p))
            && self.color.map_or(true, |c| token.color == c)
            && self
                .correlation_id
                .as_deref()
                .map_or(true, |c| meta.correlation_id == c)
            && self.created_after.map_or(true, |t| meta.created_at > t)
            && self.created_before.map_or(true, |t| meta.created_at < t)
    }
}

/// Audit persistence for tokens.
///
/// The engine calls `save` on every placement without waiting for it, so an
/// implementation must tolerate its errors being logged and dropped.
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Insert or replace by token id.
    async fn save(&self, token: &Token) -> Result<(), StoreError>;

    async fn get(&self, id: Uuid) -> Result<Option<Token>, StoreError>;

    async fn get_by_correlation_id(&self, correlation_id: &str) -> Result<Vec<Token>, StoreError>;

    /// Returns whether a token was removed.
    async fn delete(&self, id: Uuid) -> Result<bool, StoreError>;

    async fn save_all(&self, tokens: &[Token]) -> Result<(), StoreError> {
        for token in tokens {
            self.save(token).await?;
        }
        Ok(())
    }

    async fn get_all(&self) -> Result<Vec<Token>, StoreError>;

    async fn clear(&self) -> Result<(), StoreError>;

    /// Purge tokens last updated more than `retention_days` ago; returns how many.
    async fn cleanup(&self, retention_days: u32) -> Result<usize, StoreError>;

    async fn query(&self, filter: &TokenQuery) -> Result<Vec<Token>, StoreError>;
}
