//! Token Counting
//!
//! Local token estimation so prompts can be budgeted against a model's
//! context window without a network round-trip. Estimates deliberately
//! lean high for source code, where operators and punctuation tokenize
//! one at a time.

/// Characters that tokenize individually in source code.
const CODE_SYMBOLS: &str = "(){}[];:,.+-*/=<>!&|@#$%^~?\\";

/// Token estimation method
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum TokenEstimator {
    /// Character-based estimation (4 chars per token), fine for prose
    CharBased,
    /// Word-based estimation (0.75 tokens per word on average)
    WordBased,
    /// Code-aware estimation: symbols count one token each, words by length
    #[default]
    CodeAware,
}

/// Token counter for context management
pub struct TokenCounter {
    estimator: TokenEstimator,
}

impl Default for TokenCounter {
    fn default() -> Self {
        Self::new(TokenEstimator::default())
    }
}

impl TokenCounter {
    pub fn new(estimator: TokenEstimator) -> Self {
        Self { estimator }
    }

    /// Estimate the token count of a string.
    pub fn count(&self, text: &str) -> usize {
        match self.estimator {
            TokenEstimator::CharBased => text.chars().count().div_ceil(4),
            TokenEstimator::WordBased => {
                (text.split_whitespace().count() as f32 * 0.75).ceil() as usize + 1
            }
            TokenEstimator::CodeAware => count_code_aware(text),
        }
    }

    /// Whether the text fits within a token budget.
    pub fn fits_budget(&self, text: &str, budget: usize) -> bool {
        self.count(text) <= budget
    }

    /// Budget left after the text, saturating at zero.
    pub fn remaining_budget(&self, text: &str, budget: usize) -> usize {
        budget.saturating_sub(self.count(text))
    }
}

fn is_code_symbol(c: char) -> bool {
    CODE_SYMBOLS.contains(c)
}

/// Each symbol character is one token; every maximal run of other
/// non-whitespace characters counts by length.
fn count_code_aware(text: &str) -> usize {
    let mut tokens = 0;

    for run in text.split_whitespace() {
        tokens += run.chars().filter(|c| is_code_symbol(*c)).count();
        tokens += run
            .split(is_code_symbol)
            .filter(|word| !word.is_empty())
            .map(|word| word_tokens(word.len()))
            .sum::<usize>();
    }

    tokens.max(1)
}

fn word_tokens(len: usize) -> usize {
    match len {
        0..=4 => 1,
        5..=8 => 2,
        n => n.div_ceil(4),
    }
}
