mod withholding_calculator;

pub use withholding_calculator::{Pph21Calculator, WithholdingCalculator, RECONCILIATION_MONTH};
