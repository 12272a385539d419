use comfy_table::{Attribute, Cell, CellAlignment, Color, Table, modifiers, presets};

use crate::{
    core::{battery::BatteryInterval, flow::FlowRecord},
    quantity::energy::WattHours,
};

pub fn build_intervals_table(battery: &[BatteryInterval], flows: &[FlowRecord]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL_CONDENSED)
        .apply_modifier(modifiers::UTF8_ROUND_CORNERS)
        .enforce_styling();
    table.set_header(vec![
        "Date", "Time", "Period", "Action", "Before", "After", "Grid → House", "Grid → Battery",
        "Solar → House", "Battery → House", "Solar → Battery", "Solar → Grid",
    ]);
    for (interval, flows) in battery.iter().zip(flows) {
        let mut row = vec![
            Cell::new(interval.timestamp.format("%b %d")).add_attribute(Attribute::Dim),
            Cell::new(interval.timestamp.format("%H:%M")),
            Cell::new(interval.period).fg(interval.period.color()),
            Cell::new(interval.action).fg(interval.action.color()),
            Cell::new(interval.level_before)
                .set_alignment(CellAlignment::Right)
                .add_attribute(Attribute::Dim),
            Cell::new(interval.level_after).set_alignment(CellAlignment::Right),
        ];
        row.extend(flows.iter().map(|(category, energy)| {
            let cell = Cell::new(energy).set_alignment(CellAlignment::Right);
            if *energy <= WattHours::ZERO {
                cell.add_attribute(Attribute::Dim)
            } else if category.is_period_sensitive() {
                cell.fg(interval.period.color())
            } else {
                cell.fg(Color::Cyan)
            }
        }));
        table.add_row(row);
    }
    table
}
