//! End-to-end partition runs: configuration contract through runner through
//! the resize transform.

use arrow::array::{Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use rb_resize::{ResizeConfiguration, ResizeTransform, MAX_ROWS_PER_TABLE_KEY};
use rb_runner::PartitionRunner;
use rb_traits::TransformConfiguration;
use rb_types::{Batch, ParamMap, ParamValue};
use std::sync::Arc;

fn int_batch(first_id: i64, num_rows: usize) -> Batch {
    let schema = Arc::new(Schema::new(vec![Field::new("id", DataType::Int64, false)]));
    let ids: Vec<i64> = (first_id..first_id + num_rows as i64).collect();
    Arc::new(RecordBatch::try_new(schema, vec![Arc::new(Int64Array::from(ids))]).unwrap())
}

fn string_batch(num_rows: usize) -> Batch {
    let schema = Arc::new(Schema::new(vec![Field::new("doc", DataType::Utf8, false)]));
    let docs: Vec<String> = (0..num_rows).map(|i| format!("doc-{i}")).collect();
    Arc::new(RecordBatch::try_new(schema, vec![Arc::new(StringArray::from(docs))]).unwrap())
}

fn row_limit_params(limit: i64) -> ParamMap {
    [(MAX_ROWS_PER_TABLE_KEY.to_string(), ParamValue::Int(limit))]
        .into_iter()
        .collect()
}

#[test]
fn partition_run_preserves_rows_and_order() {
    let contract = ResizeConfiguration::new();
    let config = contract.validate_and_apply(&row_limit_params(1000)).unwrap();

    let mut runner = PartitionRunner::new(ResizeTransform::new(config));

    let mut emitted = Vec::new();
    let mut next_id = 0i64;
    for rows in [2500, 400, 1700, 3] {
        emitted.extend(runner.process(int_batch(next_id, rows)).unwrap());
        next_id += rows as i64;
    }
    let (tail, stats) = runner.finish().unwrap();
    emitted.extend(tail);

    let all_ids: Vec<i64> = emitted
        .iter()
        .flat_map(|b| {
            b.column(0)
                .as_any()
                .downcast_ref::<Int64Array>()
                .unwrap()
                .values()
                .to_vec()
        })
        .collect();
    assert_eq!(all_ids, (0..4603).collect::<Vec<i64>>());

    assert_eq!(stats.get("source_batches"), Some(4.0));
    assert_eq!(stats.get("source_rows"), Some(4603.0));
    assert_eq!(stats.get("result_rows"), Some(4603.0));
    // 4 full chunks of 1000 plus the flushed remainder
    assert_eq!(stats.get("result_batches"), Some(5.0));
    assert_eq!(emitted.last().unwrap().num_rows(), 603);
}

#[test]
fn partition_survives_schema_mismatch() {
    let contract = ResizeConfiguration::new();
    let config = contract.validate_and_apply(&row_limit_params(100)).unwrap();

    let mut runner = PartitionRunner::new(ResizeTransform::new(config));

    runner.process(int_batch(0, 60)).unwrap();

    // incompatible batch is rejected; buffered rows survive
    let outputs = runner.process(string_batch(10)).unwrap();
    assert!(outputs.is_empty());

    let outputs = runner.process(int_batch(60, 40)).unwrap();
    assert_eq!(outputs.len(), 1);
    assert_eq!(outputs[0].num_rows(), 100);

    let (_, stats) = runner.finish().unwrap();
    assert_eq!(stats.get("transform_errors"), Some(1.0));
    assert_eq!(stats.get("result_rows"), Some(100.0));
}

#[test]
fn misconfiguration_stops_before_data_flows() {
    let contract = ResizeConfiguration::new();
    let raw: ParamMap = [
        (MAX_ROWS_PER_TABLE_KEY.to_string(), ParamValue::Int(1000)),
        (
            rb_resize::MAX_MBYTES_PER_TABLE_KEY.to_string(),
            ParamValue::Float(16.0),
        ),
    ]
    .into_iter()
    .collect();

    assert!(contract.validate_and_apply(&raw).is_err());
}
