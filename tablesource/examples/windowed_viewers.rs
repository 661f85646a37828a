// Example: two viewers attached to one source, each with its own visible range.
use std::sync::Arc;

use tablesource::{DataSource, DataSourceOptions, FieldRecord, ViewRange, ViewerId};

fn main() {
    let records: Arc<[FieldRecord]> = (0..100)
        .map(|i| FieldRecord::new().with("n", i as i64))
        .collect();
    let mut source = DataSource::new(records, DataSourceOptions::new()).expect("non-empty");

    let top = source.connect(ViewerId(1), |rows| {
        println!("top: {} rows starting at id {:?}", rows.len(), rows.first().map(|r| r.id()))
    });
    source.connect(ViewerId(2), |rows| {
        println!("bottom: {} rows starting at id {:?}", rows.len(), rows.first().map(|r| r.id()))
    });

    top.report(ViewRange::new(0, 10));
    source.report_range(ViewerId(2), ViewRange::from_start(90));

    source.move_row(0, 1).expect("in bounds");
    source.disconnect(ViewerId(1));
    source.delete(99).expect("row 99 exists");
}
