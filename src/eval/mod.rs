//! Hand ranking: five-card evaluation and best-of-seven selection.

pub mod best;
pub mod hand;

pub use best::{best_of_seven, best_of_seven_tokens, five_card_subsets};
pub use hand::{evaluate, Evaluation, Hand, HandCategory, RankHistogram, RuleCheck, Score};
