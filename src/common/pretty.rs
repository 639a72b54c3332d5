use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Table};

use crate::catalog::schema::Schema;
use crate::storage::table::tuple::Tuple;

/// Renders a result set as a bordered table, one row per tuple.
pub fn pretty_format(schema: &Schema, tuples: &[Tuple]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(
        schema
            .columns()
            .iter()
            .map(|c| Cell::new(&c.name))
            .collect::<Vec<_>>(),
    );
    for tuple in tuples {
        table.add_row(
            tuple
                .values(schema)
                .iter()
                .map(|v| Cell::new(v.to_string()))
                .collect::<Vec<_>>(),
        );
    }
    table
}
