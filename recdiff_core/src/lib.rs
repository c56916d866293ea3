pub mod binary_diff;
pub mod field_diff;
pub mod report;
pub mod shift;
pub mod source;

pub use binary_diff::{BinaryDiffEngine, StructureCheck, WindowReport, WindowResult};
pub use field_diff::{
    ContextRow, ExtraField, FieldDiffEngine, FieldDiffResult, FieldMismatch, MissingField,
    RangeAccuracy,
};
pub use report::{BinarySummary, FieldSummary, ShiftHint};
pub use shift::{detect_shift, first_mismatch};
pub use source::{load_binary, load_text_records};
