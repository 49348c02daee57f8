// Withholding module
//
// PPh 21 employee income-tax withholding: effective-rate (TER) tables for
// January to November, progressive Pasal 17 reconciliation in December.

pub mod models;
pub mod services;

pub use models::{
    ProgressiveBracket, PtkpCode, TaxMethod, TerBracket, TerCategory, WithholdingInput,
    WithholdingResult, WithholdingTables, YearToDate,
};
pub use services::{Pph21Calculator, WithholdingCalculator, RECONCILIATION_MONTH};
