// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod config;
mod execution;
mod store;

pub use config::{ConfigError, NetConfigError};
pub use execution::{ActionError, ExecutionError};
pub use store::StoreError;
