pub mod evaluator;
pub mod handlers;

pub use evaluator::Evaluator;
