// Example: create, validate, confirm and delete rows.
use std::sync::Arc;

use tablesource::{
    DataSource, DataSourceOptions, FieldRecord, FieldValue, PENDING_ROW_ID,
    PredicateValidatorService,
};

fn main() {
    let records: Arc<[FieldRecord]> = Arc::from(vec![
        FieldRecord::new().with("name", "Ada").with("age", 36),
        FieldRecord::new().with("name", "Linus").with("age", 54),
    ]);
    let validator = PredicateValidatorService::new(|r: &FieldRecord| {
        r.get("name")
            .and_then(FieldValue::as_text)
            .is_some_and(|s| !s.is_empty())
    })
    .with_fields(["age", "name"]);

    let mut source =
        DataSource::new(records, DataSourceOptions::new().with_validator_service(validator))
            .expect("records determine the shape");
    source.subscribe_records(|records| println!("records: {records:?}"));

    source.create_new(None);
    let accepted = source.confirm_create(PENDING_ROW_ID).expect("pending row exists");
    println!("empty row accepted: {accepted}");

    source
        .patch_row(
            PENDING_ROW_ID,
            FieldRecord::new().with("name", "Grace").with("age", 85),
        )
        .expect("pending row exists");
    let accepted = source.confirm_create(PENDING_ROW_ID).expect("pending row exists");
    println!("filled row accepted: {accepted}");

    source.delete(0).expect("row 0 exists");
    for row in source.rows() {
        println!("{} {:?}", row.id(), row.current_data());
    }
}
