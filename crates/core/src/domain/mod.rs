pub mod allocation;
pub mod items;
pub mod verdict;

pub use allocation::Allocation;
pub use items::ItemSet;
pub use verdict::{DecisionBranch, Evaluation, OfferContext, Verdict};
