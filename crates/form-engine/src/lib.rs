//! Document rendering for the administrative forms
//!
//! This crate turns the records of `form-types` into PDF bytes and HTML
//! previews:
//! - Calendar-aware labelling of timesheet day rows
//! - Discount schedule and installment plans for infraction notices
//! - One layout per document kind, drawn on a `pdf-layout` canvas
//! - The form registry used by the server to list and dispatch forms

pub mod assets;
pub mod calendar;
pub mod documents;
pub mod error;
pub mod format;
pub mod installments;
pub mod preview;
pub mod registry;

pub use assets::{Assets, Logo};
pub use calendar::{classify_day, month_rows, DayKind, DayRow, LabelStyle};
pub use error::RenderError;
pub use format::{format_brl, format_percent};
pub use installments::{
    deadline_message, discount_column, discount_percent, discount_table, limit_message, plan,
    DiscountRow, InstallmentPlan,
};
pub use preview::render_preview;
pub use registry::{list_forms, FieldSpec, FormDocument, FormInfo, FormKind, InputKind};
