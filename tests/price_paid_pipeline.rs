use price_paid::config::PipelineConfig;
use price_paid::error::AppError;
use price_paid::runner::aggregate_file;
use price_paid::workflows::price_paid::{
    LocationSet, MalformedRecordPolicy, PriceAggregate, PricePaidError, PricePaidPipeline,
    PropertyAge, PropertyType,
};
use std::fs;
use std::path::Path;

const THREE_SALES: &str = "\
\"{A1}\",\"500000\",\"2016-03-01 10:00\",\"SW1 9AA\",\"D\",\"N\",\"F\",\"1\",\"\",\"HIGH ST\",\"\",\"LONDON\",\"LONDON\",\"WESTMINSTER\",\"GREATER LONDON\",\"A\",\"A\"
\"{A2}\",\"300000\",\"2014-01-01 10:00\",\"SW1 9AB\",\"D\",\"N\",\"F\",\"2\",\"\",\"HIGH ST\",\"\",\"LONDON\",\"LONDON\",\"WESTMINSTER\",\"GREATER LONDON\",\"A\",\"A\"
\"{A3}\",\"200000\",\"2017-05-05 10:00\",\"ZZ99 9ZZ\",\"F\",\"Y\",\"F\",\"3\",\"\",\"MAIN RD\",\"\",\"NOWHERE\",\"NOWHERE\",\"NOWHERE\",\"NOWHERE\",\"A\",\"A\"
";

fn pipeline_config(dir: &Path, input: &str) -> PipelineConfig {
    let input_path = dir.join("pp-complete.csv");
    fs::write(&input_path, input).expect("write input");
    PipelineConfig {
        input: input_path,
        output: dir.join("stats.json"),
        locations: None,
        min_year: 2015,
        has_headers: false,
        on_malformed: MalformedRecordPolicy::Abort,
        pretty: true,
    }
}

#[test]
fn three_sales_produce_a_single_path() {
    let run = PricePaidPipeline::new(LocationSet::london())
        .run_reader(THREE_SALES.as_bytes())
        .expect("pipeline runs");

    let json = serde_json::to_value(&run.aggregate).expect("serializes");
    assert_eq!(
        json,
        serde_json::json!({ "SW1": { "2016": { "Detached": { "Old": [500000] } } } })
    );
    assert_eq!(run.stats.records_read, 3);
    assert_eq!(run.stats.eligible, 1);
    assert_eq!(run.stats.dropped, 2);
}

#[test]
fn new_build_flag_groups_under_new() {
    let csv = THREE_SALES.replacen("\"D\",\"N\",\"F\",\"1\"", "\"D\",\"Y\",\"F\",\"1\"", 1);
    let run = PricePaidPipeline::new(LocationSet::london())
        .run_reader(csv.as_bytes())
        .expect("pipeline runs");

    assert_eq!(run.aggregate.len(), 1);
    assert_eq!(
        run.aggregate
            .prices("SW1", 2016, PropertyType::Detached, PropertyAge::New),
        Some(&[500_000][..])
    );
}

#[test]
fn threshold_year_is_included_and_prior_year_excluded() {
    let csv = "a,100,2015-01-01 00:00,E1 1AA,S,N,F\n\
b,200,2014-12-31 23:59,E1 1AA,S,N,F\n";
    let run = PricePaidPipeline::new(LocationSet::london())
        .run_reader(csv.as_bytes())
        .expect("pipeline runs");

    assert_eq!(
        run.aggregate
            .prices("E1", 2015, PropertyType::SemiDetached, PropertyAge::Old),
        Some(&[100][..])
    );
    assert!(run
        .aggregate
        .prices("E1", 2014, PropertyType::SemiDetached, PropertyAge::Old)
        .is_none());
}

#[test]
fn empty_postcode_and_leasehold_are_excluded() {
    let csv = "a,100,2016-01-01 00:00,,D,Y,F\n\
b,200,2016-01-01 00:00,E1 1AA,D,Y,L\n\
c,300,2016-01-01 00:00,E1,D,Y,F\n";
    let run = PricePaidPipeline::new(LocationSet::london())
        .run_reader(csv.as_bytes())
        .expect("pipeline runs");

    assert_eq!(run.stats.eligible, 1);
    assert_eq!(
        run.aggregate
            .prices("E1", 2016, PropertyType::Detached, PropertyAge::New),
        Some(&[300][..])
    );
}

#[test]
fn same_leaf_prices_follow_year_then_file_order() {
    let csv = "a,1,2018-01-01 00:00,N1 1AA,T,N,F\n\
b,2,2016-05-01 00:00,N1 1AA,T,N,F\n\
c,3,2018-02-01 00:00,N1 1AA,T,N,F\n\
d,4,2016-01-01 00:00,N1 1AA,T,N,F\n";
    let run = PricePaidPipeline::new(LocationSet::london())
        .run_reader(csv.as_bytes())
        .expect("pipeline runs");

    assert_eq!(
        run.aggregate
            .prices("N1", 2016, PropertyType::Terraced, PropertyAge::Old),
        Some(&[2, 4][..])
    );
    assert_eq!(
        run.aggregate
            .prices("N1", 2018, PropertyType::Terraced, PropertyAge::Old),
        Some(&[1, 3][..])
    );
}

#[test]
fn aggregate_file_writes_json_that_parses_back() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = pipeline_config(dir.path(), THREE_SALES);

    let run = aggregate_file(&config).expect("aggregation succeeds");
    assert!(!dir.path().join("stats.json.tmp").exists());

    let written = fs::read_to_string(&config.output).expect("output exists");
    assert!(written.starts_with("{\n\t\"SW1\""));
    let parsed: PriceAggregate = serde_json::from_str(&written).expect("parses back");
    assert_eq!(parsed, run.aggregate);
}

#[test]
fn malformed_price_leaves_no_output_behind() {
    let dir = tempfile::tempdir().expect("tempdir");
    let csv = format!("{THREE_SALES}x,not-a-price,2016-01-01 00:00,E1 1AA,D,N,F\n");
    let config = pipeline_config(dir.path(), &csv);

    let err = aggregate_file(&config).expect_err("bad price aborts");
    match err {
        AppError::Ingest(PricePaidError::Record { line, .. }) => assert_eq!(line, 4),
        other => panic!("expected ingest error, got {other:?}"),
    }
    assert!(!config.output.exists());
    assert!(!dir.path().join("stats.json.tmp").exists());
}

#[test]
fn existing_output_survives_a_failed_run() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = pipeline_config(dir.path(), "x,100,yesterday,E1 1AA,D,N,F\n");
    fs::write(&config.output, "{}\n").expect("seed output");

    assert!(aggregate_file(&config).is_err());
    assert_eq!(
        fs::read_to_string(&config.output).expect("still there"),
        "{}\n"
    );
}

#[test]
fn missing_input_is_reported_as_ingest_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut config = pipeline_config(dir.path(), "");
    config.input = dir.path().join("absent.csv");

    match aggregate_file(&config).expect_err("missing input") {
        AppError::Ingest(PricePaidError::Open { path, .. }) => assert_eq!(path, config.input),
        other => panic!("expected open error, got {other:?}"),
    }
    assert!(!config.output.exists());
}

#[test]
fn custom_location_file_replaces_london_defaults() {
    let dir = tempfile::tempdir().expect("tempdir");
    let locations = dir.path().join("districts.txt");
    fs::write(&locations, "# test districts\nZZ99\n").expect("write locations");

    let mut config = pipeline_config(dir.path(), THREE_SALES);
    config.locations = Some(locations);
    config.pretty = false;

    let run = aggregate_file(&config).expect("aggregation succeeds");
    let written = fs::read_to_string(&config.output).expect("output exists");
    assert_eq!(
        written,
        "{\"ZZ99\":{\"2017\":{\"Flat\":{\"New\":[200000]}}}}\n"
    );
    assert_eq!(run.stats.eligible, 1);
}

#[test]
fn header_row_can_be_skipped() {
    let dir = tempfile::tempdir().expect("tempdir");
    let csv = format!("id,price,date,postcode,type,new,duration\n{THREE_SALES}");
    let mut config = pipeline_config(dir.path(), &csv);

    assert!(matches!(
        aggregate_file(&config),
        Err(AppError::Ingest(PricePaidError::Record { line: 1, .. }))
    ));

    config.has_headers = true;
    let run = aggregate_file(&config).expect("header skipped");
    assert_eq!(run.stats.records_read, 3);
    assert_eq!(run.aggregate.len(), 1);
}
