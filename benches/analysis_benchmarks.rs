use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rowdupe::analysis::{column_statistics, AnalysisOptions, Analyzer};
use rowdupe::table::{CsvSource, Table, Value};

// Helper to build a table where roughly every tenth key repeats
fn setup_table(rows: usize) -> Table {
    let data: Vec<Vec<Value>> = (0..rows)
        .map(|i| {
            let key = if i % 10 == 0 { i / 10 } else { i + rows };
            vec![
                Value::from(key as i64),
                Value::from(format!("name_{}", i % 7)),
                Value::from((i % 3) as i64),
                if i % 11 == 0 {
                    Value::Null
                } else {
                    Value::from(format!("user{}@example.com", i % 5))
                },
            ]
        })
        .collect();
    Table::from_rows(&["id", "name", "tier", "email"], data).unwrap()
}

fn setup_csv(rows: usize) -> String {
    let mut csv = String::from("id,name,tier,email\n");
    for i in 0..rows {
        csv.push_str(&format!("{},name_{},{},u{}@x\n", i / 2, i % 7, i % 3, i % 5));
    }
    csv
}

// 1. Column Statistics Benchmarks
fn bench_statistics(c: &mut Criterion) {
    let table = setup_table(100_000);
    let keys = &table.column("id").unwrap().values;

    c.bench_function("statistics_100k_rows", |b| {
        b.iter(|| black_box(column_statistics(black_box(keys))))
    });
}

// 2. Full Analysis Benchmarks (sequential vs parallel)
fn bench_analysis(c: &mut Criterion) {
    let mut group = c.benchmark_group("analysis");
    let full = AnalysisOptions::default()
        .with_root_cause(true)
        .with_conflict_summary(true);

    for rows in [1_000, 100_000] {
        let table = setup_table(rows);

        group.bench_with_input(BenchmarkId::new("sequential", rows), &table, |b, t| {
            let analyzer = Analyzer::new(full);
            b.iter(|| black_box(analyzer.analyze(t, "id").unwrap()))
        });

        group.bench_with_input(BenchmarkId::new("parallel", rows), &table, |b, t| {
            let analyzer = Analyzer::new(full.with_parallel(true));
            b.iter(|| black_box(analyzer.analyze(t, "id").unwrap()))
        });
    }
    group.finish();
}

// 3. CSV Loading Benchmarks
fn bench_csv_source(c: &mut Criterion) {
    let data = setup_csv(50_000);
    let source = CsvSource::default();

    c.bench_function("csv_load_50k_rows", |b| {
        b.iter(|| black_box(source.read_from(data.as_bytes()).unwrap()))
    });
}

criterion_group!(benches, bench_statistics, bench_analysis, bench_csv_source);
criterion_main!(benches);
