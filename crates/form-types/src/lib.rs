//! Shared value records for the administrative forms
//!
//! Every form submission becomes one of these records, is rendered once and
//! then discarded. Nothing here is persisted.

pub mod error;
pub mod fields;
pub mod holidays;
pub mod month;
pub mod records;

pub use error::FormError;
pub use fields::FieldValues;
pub use holidays::{HolidayEntryError, HolidayMap};
pub use month::{Month, TIMESHEET_YEARS, VEHICLE_YEARS};
pub use records::{
    AccountType, ActivityReport, ClearanceDeclaration, FooterLines, InmateTimesheet,
    InstallmentRequest, RestitutionRequest, Sex, SugespTimesheet, VehicleLog,
};
