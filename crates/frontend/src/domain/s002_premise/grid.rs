//! In-memory model of the premises grid.
//!
//! The [`EditBuffer`] is the single owner of unsaved cell values: rebuilt
//! from server state on every full load, mutated only by cell edits and
//! copy-month, serialized wholesale on save. While the grid is open every
//! `(role, month)` combination of the axis has an entry — server-sourced or
//! defaulted — so no render site ever defaults on the fly.

use contracts::domain::s002_premise::{
    Role, RoleAssumption, RoleId, DEFAULT_ABSENTEEISM_PCT, DEFAULT_TRAINING_DAYS,
    DEFAULT_TURNOVER_PCT, DEFAULT_VACATION_INDEX_PCT,
};
use contracts::domain::s004_scenario::PlanningHorizon;
use std::collections::HashMap;
use thiserror::Error;

// ============================================================================
// Month axis
// ============================================================================

/// One grid column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct YearMonth {
    pub year: i32,
    /// 1–12
    pub month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    /// Column header, "MM/AAAA".
    pub fn label(&self) -> String {
        format!("{:02}/{}", self.month, self.year)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InvalidRangeError {
    #[error("month range ends before it starts")]
    EndBeforeStart,

    #[error("month out of range: {0}")]
    MonthOutOfRange(u32),
}

/// Ordered, inclusive `(year, month)` sequence spanning the horizon, with
/// month 12 wrapping into January of the next year. Pure and deterministic;
/// fails synchronously, before any network activity.
pub fn month_axis(horizon: PlanningHorizon) -> Result<Vec<YearMonth>, InvalidRangeError> {
    for month in [horizon.start_month, horizon.end_month] {
        if !(1..=12).contains(&month) {
            return Err(InvalidRangeError::MonthOutOfRange(month));
        }
    }
    let start = YearMonth::new(horizon.start_year, horizon.start_month);
    let end = YearMonth::new(horizon.end_year, horizon.end_month);
    if end < start {
        return Err(InvalidRangeError::EndBeforeStart);
    }

    let mut axis = Vec::new();
    let mut cursor = start;
    loop {
        axis.push(cursor);
        if cursor == end {
            break;
        }
        cursor = if cursor.month == 12 {
            YearMonth::new(cursor.year + 1, 1)
        } else {
            YearMonth::new(cursor.year, cursor.month + 1)
        };
    }
    Ok(axis)
}

// ============================================================================
// Cells
// ============================================================================

/// Natural key of one cell: `(role, month, year)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellKey {
    pub role_id: RoleId,
    pub year: i32,
    pub month: u32,
}

impl CellKey {
    pub fn new(role_id: RoleId, ym: YearMonth) -> Self {
        Self {
            role_id,
            year: ym.year,
            month: ym.month,
        }
    }
}

/// The four editable assumption fields of one cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellValues {
    pub absenteeism_pct: f64,
    pub turnover_pct: f64,
    pub vacation_index_pct: f64,
    pub training_days: i32,
}

impl Default for CellValues {
    fn default() -> Self {
        Self {
            absenteeism_pct: DEFAULT_ABSENTEEISM_PCT,
            turnover_pct: DEFAULT_TURNOVER_PCT,
            vacation_index_pct: DEFAULT_VACATION_INDEX_PCT,
            training_days: DEFAULT_TRAINING_DAYS,
        }
    }
}

impl From<&RoleAssumption> for CellValues {
    fn from(record: &RoleAssumption) -> Self {
        Self {
            absenteeism_pct: record.absenteeism_pct,
            turnover_pct: record.turnover_pct,
            vacation_index_pct: record.vacation_index_pct,
            training_days: record.training_days,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellField {
    AbsenteeismPct,
    TurnoverPct,
    VacationIndexPct,
    TrainingDays,
}

impl CellField {
    pub const ALL: [CellField; 4] = [
        CellField::AbsenteeismPct,
        CellField::TurnoverPct,
        CellField::VacationIndexPct,
        CellField::TrainingDays,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            CellField::AbsenteeismPct => "Absenteísmo %",
            CellField::TurnoverPct => "Turnover %",
            CellField::VacationIndexPct => "Índice férias %",
            CellField::TrainingDays => "Dias treinamento",
        }
    }
}

// ============================================================================
// Edit buffer
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EditBuffer {
    cells: HashMap<CellKey, CellValues>,
    dirty: bool,
}

impl EditBuffer {
    /// Rebuild from server state: one entry per `(role, month)` of the axis,
    /// copied from the matching server record or defaulted. Guarantees total
    /// grid coverage; a fresh buffer is clean.
    pub fn rebuild(roles: &[Role], axis: &[YearMonth], records: &[RoleAssumption]) -> Self {
        let by_key: HashMap<CellKey, &RoleAssumption> = records
            .iter()
            .map(|r| {
                (
                    CellKey {
                        role_id: r.role_id,
                        year: r.year,
                        month: r.month,
                    },
                    r,
                )
            })
            .collect();

        let mut cells = HashMap::with_capacity(roles.len() * axis.len());
        for role in roles {
            for ym in axis {
                let key = CellKey::new(role.id, *ym);
                let values = by_key
                    .get(&key)
                    .map(|r| CellValues::from(*r))
                    .unwrap_or_default();
                cells.insert(key, values);
            }
        }
        Self {
            cells,
            dirty: false,
        }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn get(&self, key: CellKey) -> Option<&CellValues> {
        self.cells.get(&key)
    }

    /// Cell values for rendering; covered cells always hit the buffer, the
    /// default is only a guard for keys outside the rebuilt axis.
    pub fn value(&self, key: CellKey) -> CellValues {
        self.cells.get(&key).copied().unwrap_or_default()
    }

    pub fn field_text(&self, key: CellKey, field: CellField) -> String {
        let values = self.value(key);
        match field {
            CellField::AbsenteeismPct => values.absenteeism_pct.to_string(),
            CellField::TurnoverPct => values.turnover_pct.to_string(),
            CellField::VacationIndexPct => values.vacation_index_pct.to_string(),
            CellField::TrainingDays => values.training_days.to_string(),
        }
    }

    /// Apply one cell edit. Validation is explicit: input that does not
    /// parse as a number of the field's type is rejected and the buffer
    /// keeps its previous value (no silent zero-coercion). Accepts the
    /// decimal comma. Returns whether the edit was applied.
    pub fn set_field(&mut self, key: CellKey, field: CellField, raw: &str) -> bool {
        let Some(cell) = self.cells.get_mut(&key) else {
            return false;
        };
        let raw = raw.trim().replace(',', ".");
        match field {
            CellField::TrainingDays => {
                let Ok(days) = raw.parse::<i32>() else {
                    return false;
                };
                cell.training_days = days;
            }
            _ => {
                let Ok(value) = raw.parse::<f64>() else {
                    return false;
                };
                if !value.is_finite() {
                    return false;
                }
                match field {
                    CellField::AbsenteeismPct => cell.absenteeism_pct = value,
                    CellField::TurnoverPct => cell.turnover_pct = value,
                    CellField::VacationIndexPct => cell.vacation_index_pct = value,
                    CellField::TrainingDays => unreachable!(),
                }
            }
        }
        self.dirty = true;
        true
    }

    /// Overwrite every role's target cell with a copy of its source cell as
    /// it exists right now. Value semantics: later edits to the source do
    /// not reach the target. Roles without a source entry are left alone.
    pub fn copy_month(&mut self, roles: &[Role], source: YearMonth, target: YearMonth) {
        let mut copied = false;
        for role in roles {
            let src_key = CellKey::new(role.id, source);
            let dst_key = CellKey::new(role.id, target);
            if let Some(values) = self.cells.get(&src_key).copied() {
                self.cells.insert(dst_key, values);
                copied = true;
            }
        }
        if copied {
            self.dirty = true;
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    /// Serialize the whole grid for the bulk upsert: every `(role, month)`
    /// of the axis, taking the buffer entry or the defaults if one is
    /// somehow absent. Does not mutate the buffer — a failed save therefore
    /// leaves every edit in place.
    pub fn to_records(&self, roles: &[Role], axis: &[YearMonth]) -> Vec<RoleAssumption> {
        let mut records = Vec::with_capacity(roles.len() * axis.len());
        for role in roles {
            for ym in axis {
                let values = self.value(CellKey::new(role.id, *ym));
                records.push(RoleAssumption {
                    role_id: role.id,
                    month: ym.month,
                    year: ym.year,
                    absenteeism_pct: values.absenteeism_pct,
                    turnover_pct: values.turnover_pct,
                    vacation_index_pct: values.vacation_index_pct,
                    training_days: values.training_days,
                });
            }
        }
        records
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn role(name: &str) -> Role {
        Role {
            id: RoleId::new_v4(),
            name: name.to_string(),
        }
    }

    fn horizon(sy: i32, sm: u32, ey: i32, em: u32) -> PlanningHorizon {
        PlanningHorizon {
            start_year: sy,
            start_month: sm,
            end_year: ey,
            end_month: em,
        }
    }

    #[test]
    fn month_axis_wraps_at_year_boundary() {
        let axis = month_axis(horizon(2024, 11, 2025, 2)).unwrap();
        assert_eq!(
            axis,
            vec![
                YearMonth::new(2024, 11),
                YearMonth::new(2024, 12),
                YearMonth::new(2025, 1),
                YearMonth::new(2025, 2),
            ]
        );
    }

    #[test]
    fn month_axis_is_inclusive_and_ordered() {
        let axis = month_axis(horizon(2024, 1, 2024, 12)).unwrap();
        assert_eq!(axis.len(), 12);
        assert!(axis.windows(2).all(|w| w[0] < w[1]));

        let single = month_axis(horizon(2024, 6, 2024, 6)).unwrap();
        assert_eq!(single, vec![YearMonth::new(2024, 6)]);
    }

    #[test]
    fn month_axis_rejects_end_before_start() {
        assert_eq!(
            month_axis(horizon(2025, 1, 2024, 12)),
            Err(InvalidRangeError::EndBeforeStart)
        );
        assert_eq!(
            month_axis(horizon(2024, 5, 2024, 4)),
            Err(InvalidRangeError::EndBeforeStart)
        );
    }

    #[test]
    fn month_axis_rejects_month_out_of_range() {
        assert_eq!(
            month_axis(horizon(2024, 13, 2024, 12)),
            Err(InvalidRangeError::MonthOutOfRange(13))
        );
        assert_eq!(
            month_axis(horizon(2024, 1, 2024, 0)),
            Err(InvalidRangeError::MonthOutOfRange(0))
        );
    }

    #[test]
    fn rebuild_covers_every_role_month_pair() {
        let roles = vec![role("Vigilante"), role("Porteiro")];
        let axis = month_axis(horizon(2024, 1, 2024, 12)).unwrap();
        let buffer = EditBuffer::rebuild(&roles, &axis, &[]);

        assert_eq!(buffer.len(), 24);
        for r in &roles {
            for ym in &axis {
                assert!(buffer.get(CellKey::new(r.id, *ym)).is_some());
            }
        }
        assert!(!buffer.is_dirty());
    }

    #[test]
    fn cells_without_server_record_take_defaults() {
        let roles = vec![role("Vigilante")];
        let axis = month_axis(horizon(2024, 1, 2024, 2)).unwrap();
        let served = RoleAssumption {
            role_id: roles[0].id,
            month: 1,
            year: 2024,
            absenteeism_pct: 4.5,
            turnover_pct: 6.0,
            vacation_index_pct: 9.0,
            training_days: 10,
        };
        let buffer = EditBuffer::rebuild(&roles, &axis, &[served.clone()]);

        let loaded = buffer.value(CellKey::new(roles[0].id, YearMonth::new(2024, 1)));
        assert_eq!(loaded, CellValues::from(&served));

        let defaulted = buffer.value(CellKey::new(roles[0].id, YearMonth::new(2024, 2)));
        assert_eq!(defaulted.absenteeism_pct, 3.0);
        assert_eq!(defaulted.turnover_pct, 5.0);
        assert_eq!(defaulted.vacation_index_pct, 8.33);
        assert_eq!(defaulted.training_days, 15);
    }

    #[test]
    fn set_field_applies_numeric_input_and_marks_dirty() {
        let roles = vec![role("Vigilante")];
        let axis = month_axis(horizon(2024, 1, 2024, 1)).unwrap();
        let mut buffer = EditBuffer::rebuild(&roles, &axis, &[]);
        let key = CellKey::new(roles[0].id, YearMonth::new(2024, 1));

        assert!(buffer.set_field(key, CellField::TurnoverPct, "7.25"));
        assert_eq!(buffer.value(key).turnover_pct, 7.25);
        assert!(buffer.is_dirty());

        // Decimal comma is accepted.
        assert!(buffer.set_field(key, CellField::AbsenteeismPct, "2,5"));
        assert_eq!(buffer.value(key).absenteeism_pct, 2.5);

        assert!(buffer.set_field(key, CellField::TrainingDays, "20"));
        assert_eq!(buffer.value(key).training_days, 20);
    }

    #[test]
    fn set_field_rejects_invalid_input_keeping_previous_value() {
        let roles = vec![role("Vigilante")];
        let axis = month_axis(horizon(2024, 1, 2024, 1)).unwrap();
        let mut buffer = EditBuffer::rebuild(&roles, &axis, &[]);
        let key = CellKey::new(roles[0].id, YearMonth::new(2024, 1));

        // No zero-coercion: bad text leaves the cell untouched and clean.
        assert!(!buffer.set_field(key, CellField::TurnoverPct, "abc"));
        assert_eq!(buffer.value(key).turnover_pct, 5.0);
        assert!(!buffer.is_dirty());

        assert!(!buffer.set_field(key, CellField::TrainingDays, "12.5"));
        assert_eq!(buffer.value(key).training_days, 15);

        assert!(!buffer.set_field(key, CellField::AbsenteeismPct, ""));
        assert_eq!(buffer.value(key).absenteeism_pct, 3.0);
    }

    #[test]
    fn copy_month_takes_a_snapshot_of_the_source() {
        let roles = vec![role("Vigilante"), role("Porteiro")];
        let axis = month_axis(horizon(2024, 1, 2024, 3)).unwrap();
        let mut buffer = EditBuffer::rebuild(&roles, &axis, &[]);
        let jan = YearMonth::new(2024, 1);
        let feb = YearMonth::new(2024, 2);

        let key_jan = CellKey::new(roles[0].id, jan);
        buffer.set_field(key_jan, CellField::TurnoverPct, "9.9");

        buffer.copy_month(&roles, jan, feb);

        let key_feb = CellKey::new(roles[0].id, feb);
        assert_eq!(buffer.value(key_feb).turnover_pct, 9.9);

        // A later edit to the source must not retroactively change the target.
        buffer.set_field(key_jan, CellField::TurnoverPct, "1.0");
        assert_eq!(buffer.value(key_feb).turnover_pct, 9.9);
    }

    #[test]
    fn copy_month_without_source_entries_is_a_noop() {
        let roles = vec![role("Vigilante")];
        let axis = month_axis(horizon(2024, 1, 2024, 2)).unwrap();
        let mut buffer = EditBuffer::rebuild(&roles, &axis, &[]);
        let before = buffer.clone();

        // Source month outside the axis: nothing to copy, not an error.
        buffer.copy_month(&roles, YearMonth::new(2023, 12), YearMonth::new(2024, 1));

        assert_eq!(buffer, before);
        assert!(!buffer.is_dirty());
    }

    #[test]
    fn to_records_serializes_the_full_grid() {
        let roles = vec![role("Vigilante"), role("Porteiro")];
        let axis = month_axis(horizon(2024, 11, 2025, 2)).unwrap();
        let mut buffer = EditBuffer::rebuild(&roles, &axis, &[]);

        let key = CellKey::new(roles[1].id, YearMonth::new(2025, 1));
        buffer.set_field(key, CellField::VacationIndexPct, "11.11");

        let records = buffer.to_records(&roles, &axis);
        assert_eq!(records.len(), 8);

        let edited = records
            .iter()
            .find(|r| r.role_id == roles[1].id && r.year == 2025 && r.month == 1)
            .unwrap();
        assert_eq!(edited.vacation_index_pct, 11.11);

        let untouched = records
            .iter()
            .find(|r| r.role_id == roles[0].id && r.year == 2024 && r.month == 11)
            .unwrap();
        assert_eq!(untouched.absenteeism_pct, 3.0);
    }

    #[test]
    fn failed_save_leaves_the_buffer_intact() {
        let roles = vec![role("Vigilante")];
        let axis = month_axis(horizon(2024, 1, 2024, 3)).unwrap();
        let mut buffer = EditBuffer::rebuild(&roles, &axis, &[]);

        let key = CellKey::new(roles[0].id, YearMonth::new(2024, 2));
        buffer.set_field(key, CellField::AbsenteeismPct, "4.75");

        let before = buffer.clone();
        // Serialization is the only step before the network call; on failure
        // the editor neither clears nor marks the buffer clean.
        let _ = buffer.to_records(&roles, &axis);

        assert_eq!(buffer, before);
        assert!(buffer.is_dirty());
    }
}
