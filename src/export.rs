use std::{collections::HashMap, io::Write};

use comfy_table::{Attribute, Cell, CellAlignment, Table, modifiers, presets};
use itertools::Itertools;
use solarlog::DayValues;

use crate::prelude::*;

const HEADER: [&str; 6] = ["date", "type", "channel", "description", "unit", "value"];

/// Flat reading, ready to be written out.
#[derive(Debug, Eq, PartialEq)]
pub struct Row<'a> {
    pub date: &'a str,
    pub device_type: &'a str,
    pub channel: &'a str,
    pub description: &'a str,
    pub unit: &'a str,
    pub value: &'a str,
}

impl<'a> Row<'a> {
    const fn fields(&self) -> [&'a str; 6] {
        [self.date, self.device_type, self.channel, self.description, self.unit, self.value]
    }
}

/// Flatten the readings, ordered by device ID and then by date.
///
/// Channels unknown to the device get an empty description and unit.
pub fn rows(day_values: &HashMap<String, DayValues>) -> Vec<Row<'_>> {
    day_values
        .iter()
        .sorted_by_key(|(device_id, _)| *device_id)
        .flat_map(|(_, device_values)| {
            device_values.values.iter().map(move |(date, value)| {
                let channel = device_values.channel(value.channel());
                Row {
                    date,
                    device_type: &device_values.device.kind,
                    channel: value.channel(),
                    description: channel.map_or("", |channel| channel.description.as_str()),
                    unit: channel.map_or("", |channel| channel.unit.as_str()),
                    value: value.value(),
                }
            })
        })
        .collect()
}

pub fn write_csv<W: Write>(writer: W, rows: &[Row]) -> Result {
    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record(HEADER)?;
    for row in rows {
        writer.write_record(row.fields())?;
    }
    writer.flush().context("failed to flush the CSV")
}

pub fn build_table(rows: &[Row]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL_CONDENSED)
        .apply_modifier(modifiers::UTF8_ROUND_CORNERS)
        .set_header(HEADER);
    for row in rows {
        table.add_row(vec![
            Cell::new(row.date).add_attribute(Attribute::Dim),
            Cell::new(row.device_type),
            Cell::new(row.channel),
            Cell::new(row.description),
            Cell::new(row.unit).add_attribute(Attribute::Dim),
            Cell::new(row.value).set_alignment(CellAlignment::Right),
        ]);
    }
    table
}
