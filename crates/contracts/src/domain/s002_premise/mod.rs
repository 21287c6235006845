pub mod aggregate;

pub use aggregate::{
    BulkUpsertRequest, Role, RoleAssumption, RoleId, DEFAULT_ABSENTEEISM_PCT,
    DEFAULT_TRAINING_DAYS, DEFAULT_TURNOVER_PCT, DEFAULT_VACATION_INDEX_PCT,
};
