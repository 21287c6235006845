pub mod aggregate;

pub use aggregate::{CostCalcRequest, CostSummary, CostSummaryRow};
