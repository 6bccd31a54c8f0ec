// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::guards::Guard;

/// Level 3 extension point. Always passes until a semantic checker (ontology
/// lookup, embedding similarity) is wired in.
pub fn semantically_coherent() -> Guard {
    Guard::new("semantically_coherent", |_| true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::{Token, TokenColor};
    use serde_json::json;

    #[test]
    fn test_passes_anything() {
        let token = Token::new(json!("not a proposal"), TokenColor::Pending);
        assert!(semantically_coherent().evaluate(&[&token]));
        assert!(semantically_coherent().evaluate(&[]));
    }
}
