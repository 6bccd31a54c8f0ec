// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::guards::Guard;
use crate::token::TokenColor;

pub fn min_tokens(n: usize) -> Guard {
    Guard::new(format!("min_tokens_{}", n), move |tokens| tokens.len() >= n)
}

/// Every token carries `color`.
pub fn color_is(color: TokenColor) -> Guard {
    Guard::new(format!("color_is_{}", color), move |tokens| {
        !tokens.is_empty() && tokens.iter().all(|t| t.color == color)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::Token;
    use serde_json::json;

    #[test]
    fn test_min_tokens_and_color() {
        let a = Token::new(json!(1), TokenColor::Valid);
        let b = Token::new(json!(2), TokenColor::Invalid);

        assert!(min_tokens(2).evaluate(&[&a, &b]));
        assert!(!min_tokens(2).evaluate(&[&a]));
        assert!(color_is(TokenColor::Valid).evaluate(&[&a]));
        assert!(!color_is(TokenColor::Valid).evaluate(&[&a, &b]));
        assert!(!color_is(TokenColor::Valid).evaluate(&[]));
    }
}
