mod binary_op;
mod expression;
mod unary_op;

pub use binary_op::*;
pub use expression::*;
pub use unary_op::*;
