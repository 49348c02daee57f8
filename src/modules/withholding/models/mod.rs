mod ptkp;
mod tables;
mod withholding;

pub use ptkp::{PtkpCode, TerCategory};
pub use tables::{ProgressiveBracket, TerBracket, WithholdingTables};
pub use withholding::{TaxMethod, WithholdingInput, WithholdingResult, YearToDate};
