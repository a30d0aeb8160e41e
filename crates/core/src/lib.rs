pub mod config;
pub mod domain;
pub mod errors;
pub mod message;
pub mod protocol;
pub mod strategy;

pub use domain::{Allocation, DecisionBranch, Evaluation, ItemSet, OfferContext, Verdict};
pub use errors::{ConfigurationError, InterfaceError};
pub use message::{extract_observation, handle_message};
pub use protocol::{
    handle_request, parse_request, AcceptOrRejectRequest, AcceptOrRejectResponse,
    NegotiationRequest, NegotiationResponse, ProposeRequest, ProposeResponse,
};
pub use strategy::{
    allocator::{allocate, Allocator, GreedyAllocator, DEFAULT_TARGET_FRACTION},
    evaluator::{evaluate, OfferEvaluator, ThresholdEvaluator, ACCEPT_TOLERANCE},
    AspirationNegotiator,
};

/// The negotiator the server and CLI run with.
pub type DefaultNegotiator = AspirationNegotiator<GreedyAllocator, ThresholdEvaluator>;
