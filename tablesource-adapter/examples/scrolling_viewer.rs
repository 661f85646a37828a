// Example: a scrolling viewer that keeps its place while rows are prepended.
use std::sync::Arc;

use tablesource::{
    DataSource, DataSourceOptions, FieldRecord, PENDING_ROW_ID, ViewerId,
};
use tablesource_adapter::{RowViewport, ViewerController};

fn main() {
    let records: Arc<[FieldRecord]> = (0..1_000)
        .map(|i| FieldRecord::new().with("message", format!("message {i}")))
        .collect();
    let mut source = DataSource::new(
        records,
        DataSourceOptions::new().with_prepend_new_elements(true),
    )
    .expect("non-empty");

    let mut controller = ViewerController::connect(
        &mut source,
        ViewerId(1),
        RowViewport::new(1, 0).with_viewport_height(20),
        |rows| {
            let first = rows.first().map(|r| r.id());
            println!("viewer got {} rows, first id {first:?}", rows.len());
        },
    );
    controller.on_scroll(400);
    controller.sync(&mut source);

    let anchor = controller
        .capture_first_visible_anchor(source.rows())
        .expect("viewport shows rows");
    source.batch_update(|s| {
        for i in 0..5 {
            s.create_new(None);
            s.patch_row(
                PENDING_ROW_ID,
                FieldRecord::new().with("message", format!("new {i}")),
            )
            .expect("pending row exists");
            s.confirm_create(PENDING_ROW_ID).expect("pending row exists");
        }
    });

    controller.apply_anchor(source.rows(), &anchor);
    controller.sync(&mut source);
    println!("scroll offset after prepend: {}", controller.viewport().scroll_offset);
}
