mod common;

use std::path::Path;

use csv_cleaner::{
    categorical::Route,
    classify::{ColumnAction, ColumnRole},
    config::{DatePolicy, PipelineConfig},
    data::{Cell, Table},
    error::CleanError,
    io_utils,
    pipeline::Pipeline,
};
use encoding_rs::UTF_8;

use common::{CUSTOMERS_CSV, TestWorkspace};

fn load(csv: &str) -> Table {
    io_utils::read_table_from(csv.as_bytes(), Path::new("inline.csv"), b',', UTF_8)
        .expect("parse inline csv")
}

fn texts(table: &Table, name: &str) -> Vec<String> {
    table
        .column(name)
        .unwrap_or_else(|| panic!("column {name} missing"))
        .cells
        .iter()
        .map(Cell::as_display)
        .collect()
}

#[test]
fn customer_export_is_cleaned_end_to_end() {
    let pipeline = Pipeline::new(PipelineConfig::default()).unwrap();
    let mut table = load(CUSTOMERS_CSV);
    let report = pipeline.run(&mut table).unwrap();

    assert!(table.column("customer_id").is_none());
    assert_eq!(report.duplicate_rows, 1);
    assert_eq!(table.row_count(), 2);
    assert_eq!(texts(&table, "Name"), vec!["Alice Smith", "Bob Jones"]);
    assert!(
        table
            .column("signup_date")
            .unwrap()
            .cells
            .iter()
            .all(|cell| matches!(cell, Cell::Date(_)))
    );
    assert_eq!(texts(&table, "country"), vec!["USA", "Indonesia"]);
    assert_eq!(
        texts(&table, "phone"),
        vec!["021-555-123-4", "081-234-567-89"]
    );

    let mut buffer = Vec::new();
    io_utils::write_table_to(&table, &mut buffer, b',').unwrap();
    let written = String::from_utf8(buffer).unwrap();
    assert!(written.contains("Bob Jones,2024-03-15,Indonesia,081-234-567-89"));
}

#[test]
fn identifier_named_unique_columns_never_reach_output() {
    let pipeline = Pipeline::new(PipelineConfig::default()).unwrap();
    let mut table = load(
        "userId,NIK,id_pelanggan,country_id,kota\n\
         u1,3201,p1,ID,bandung\n\
         u2,3202,p2,ID,jakarta\n\
         u3,3203,p3,MY,jakarta\n\
         u4,3204,p4,MY,bandung\n",
    );
    let report = pipeline.run(&mut table).unwrap();
    assert_eq!(
        report.identifier_columns,
        vec!["userId", "NIK", "id_pelanggan"]
    );
    assert_eq!(table.headers(), vec!["country_id", "kota"]);
    assert_eq!(
        texts(&table, "country_id"),
        vec!["Indonesia", "Indonesia", "Malaysia", "Malaysia"]
    );
    assert_eq!(
        texts(&table, "kota"),
        vec!["Bandung", "Jakarta", "Jakarta", "Bandung"]
    );
}

#[test]
fn unique_tax_and_customer_columns_are_identifiers() {
    let pipeline = Pipeline::new(PipelineConfig::default()).unwrap();
    let mut table = load(
        "tax_number,customerName,gender,age\n\
         771001,Ani,f,30\n\
         771002,Budi,m,41\n\
         771003,Citra,f,33\n\
         771004,Dodi,m,52\n\
         771005,Eka,f,29\n\
         771006,Fajar,m,60\n",
    );
    let report = pipeline.run(&mut table).unwrap();
    assert_eq!(report.identifier_columns, vec!["tax_number", "customerName"]);
    assert_eq!(table.headers(), vec!["gender", "age"]);
}

#[test]
fn letter_grades_and_sizes_are_not_read_as_gender() {
    let pipeline = Pipeline::new(PipelineConfig::default()).unwrap();
    let mut table = load(
        "size,grade,qty\n\
         S,A,1\n\
         M,B,2\n\
         L,F,3\n\
         M,A,4\n\
         S,F,5\n\
         L,B,6\n",
    );
    pipeline.run(&mut table).unwrap();
    assert_eq!(texts(&table, "size"), vec!["S", "M", "L", "M", "S", "L"]);
    assert_eq!(texts(&table, "grade"), vec!["A", "B", "F", "A", "F", "B"]);
}

#[test]
fn two_digit_years_land_in_the_right_century() {
    let pipeline = Pipeline::new(PipelineConfig {
        day_first: true,
        ..PipelineConfig::default()
    })
    .unwrap();
    let mut table = load("tgl_kunjungan,poli\n25/12/23,gigi\n03/01/24,mata\n25/12/23,mata\n");
    pipeline.run(&mut table).unwrap();
    assert_eq!(
        texts(&table, "tgl_kunjungan"),
        vec!["2023-12-25", "2024-01-03", "2023-12-25"]
    );
}

#[test]
fn blood_type_column_ends_in_symbol_form() {
    let pipeline = Pipeline::new(PipelineConfig::default()).unwrap();
    let mut table = load(
        "golongan_darah,visit\n\
         A Positive,1\n\
         o negatif,2\n\
         AB+,3\n\
         b pos,4\n\
         unknown type,5\n\
         ,6\n",
    );
    let report = pipeline.run(&mut table).unwrap();
    let profile = report
        .profiles
        .iter()
        .find(|p| p.name == "golongan_darah")
        .unwrap();
    assert_eq!(profile.role, ColumnRole::BloodType);
    assert_eq!(
        texts(&table, "golongan_darah"),
        vec!["A+", "O-", "AB+", "B+", "unknown type", "Unknown"]
    );
}

#[test]
fn dictionary_columns_skip_spelling_correction() {
    let pipeline = Pipeline::new(PipelineConfig::default()).unwrap();
    let mut table = load(
        "marital_status,age\n\
         married,30\n\
         maried,31\n\
         lajang,32\n\
         married,33\n\
         lajang,34\n\
         maried,35\n",
    );
    let report = pipeline.run(&mut table).unwrap();
    assert_eq!(report.categorical[0].route, Route::Dictionary);
    assert_eq!(
        texts(&table, "marital_status"),
        vec!["Married", "Maried", "Single", "Married", "Single", "Maried"]
    );
}

#[test]
fn free_text_categories_are_spell_corrected() {
    let pipeline = Pipeline::new(PipelineConfig::default()).unwrap();
    let mut table = load(
        "occupation,age\n\
         teacher,30\n\
         techer,31\n\
         doctor,32\n\
         docter,33\n\
         teacher,34\n\
         doctor,35\n\
         teacher,36\n\
         doctor,37\n",
    );
    let report = pipeline.run(&mut table).unwrap();
    assert_eq!(report.categorical[0].route, Route::Correction);
    assert_eq!(
        texts(&table, "occupation"),
        vec![
            "Teacher", "Teacher", "Doctor", "Doctor", "Teacher", "Doctor", "Teacher", "Doctor"
        ]
    );
    assert!(pipeline.categorical().cache().hits() > 0);
}

#[test]
fn comment_columns_are_dropped_as_noise() {
    let pipeline = Pipeline::new(PipelineConfig::default()).unwrap();
    let mut table = load(
        "comments,gender\n\
         loved it,m\n\
         too slow,f\n\
         ok I guess,f\n\
         will come back,m\n",
    );
    let report = pipeline.run(&mut table).unwrap();
    assert_eq!(report.noise_columns, vec!["comments"]);
    assert_eq!(table.headers(), vec!["gender"]);
}

#[test]
fn noise_threshold_is_tunable() {
    let pipeline = Pipeline::new(PipelineConfig {
        noise_ratio: 1.0,
        noise_max_distinct: 1000,
        ..PipelineConfig::default()
    })
    .unwrap();
    let mut table = load("comments,gender\nloved it,m\ntoo slow,f\nloved it,f\n");
    let report = pipeline.run(&mut table).unwrap();
    assert!(report.noise_columns.is_empty());
    let comments = report
        .profiles
        .iter()
        .find(|p| p.name == "comments")
        .unwrap();
    assert_eq!(comments.action, ColumnAction::Normalize);
}

#[test]
fn day_first_changes_ambiguous_dates() {
    let pipeline = Pipeline::new(PipelineConfig {
        day_first: true,
        ..PipelineConfig::default()
    })
    .unwrap();
    let mut table = load("tanggal,item\n03/04/2024,a\n05/06/2024,b\n");
    pipeline.run(&mut table).unwrap();
    assert_eq!(texts(&table, "tanggal"), vec!["2024-04-03", "2024-06-05"]);
}

#[test]
fn missing_dates_count_as_unparsed() {
    let pipeline = Pipeline::new(PipelineConfig {
        on_unparseable_date: DatePolicy::Fail,
        ..PipelineConfig::default()
    })
    .unwrap();
    let mut table = load("dob,city\n1990-01-01,a\n,b\n");
    let err = pipeline.run(&mut table).unwrap_err();
    assert!(matches!(
        err,
        CleanError::UnparseableDates { ref column, count: 1 } if column == "dob"
    ));
}

#[test]
fn header_only_table_is_empty_table_error() {
    let pipeline = Pipeline::new(PipelineConfig::default()).unwrap();
    let mut table = load("name,country\n");
    assert!(matches!(
        pipeline.run(&mut table),
        Err(CleanError::EmptyTable)
    ));
}

#[test]
fn extra_countries_file_extends_resolver() {
    let workspace = TestWorkspace::new();
    let countries = workspace.write("countries.csv", "Wakanda,WK,WKA,Birnin Zana\n");
    let pipeline = Pipeline::new(PipelineConfig {
        countries_path: Some(countries),
        ..PipelineConfig::default()
    })
    .unwrap();
    let mut table = load("nationality,age\nwka,30\nbirnin zana,40\nwakanda,50\n");
    pipeline.run(&mut table).unwrap();
    assert_eq!(
        texts(&table, "nationality"),
        vec!["Wakanda", "Wakanda", "Wakanda"]
    );
}

#[test]
fn plan_matches_what_run_does() {
    let pipeline = Pipeline::new(PipelineConfig::default()).unwrap();
    let table = load(CUSTOMERS_CSV);
    let planned = pipeline.plan(&table).unwrap();
    let mut cleaned = table.clone();
    let report = pipeline.run(&mut cleaned).unwrap();
    let planned_roles = planned
        .iter()
        .filter(|p| p.role != ColumnRole::Identifier)
        .map(|p| (p.name.clone(), p.role))
        .collect::<Vec<_>>();
    let run_roles = report
        .profiles
        .iter()
        .map(|p| (p.name.clone(), p.role))
        .collect::<Vec<_>>();
    assert_eq!(planned_roles, run_roles);
}
