use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use mznovo::features::{extract_from_reader, FeatureRow, FeatureTable, Partitioner};
use mznovo::mgf::{format_spectra, MgfReader, MgfWriter};
use std::fmt::Write;
use std::io::{BufReader, Cursor};

/// Build an in-memory MGF run with a few extra parameters per spectrum
fn synthetic_mgf(num_spectra: usize, peaks_per_spectrum: usize) -> String {
    let mut text = String::from("MASS=Monoisotopic\n");
    for i in 0..num_spectra {
        text.push_str("BEGIN IONS\n");
        let _ = writeln!(text, "TITLE=bench.{0}.{0}.2", i);
        let _ = writeln!(text, "PEPMASS={} {}", 400.0 + (i % 800) as f64 * 0.5, 1e5);
        text.push_str("CHARGE=2+\n");
        let _ = writeln!(text, "SCANS={}", i);
        let _ = writeln!(text, "RTINSECONDS={}", i as f64 * 0.8);
        text.push_str("INSTRUMENT=ESI-QUAD-TOF\nITOL=0.05\n");
        for j in 0..peaks_per_spectrum {
            let _ = writeln!(text, "{} {}", 100.0 + j as f64 * 7.5, 1000.0 + j as f64);
        }
        text.push_str("END IONS\n\n");
    }
    text
}

fn bench_format(c: &mut Criterion) {
    let mut group = c.benchmark_group("format_mgf");

    for num_spectra in [500, 2000] {
        let text = synthetic_mgf(num_spectra, 100);
        group.throughput(Throughput::Bytes(text.len() as u64));

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}spectra", num_spectra)),
            &text,
            |b, text| {
                b.iter(|| {
                    let reader = MgfReader::new(BufReader::new(Cursor::new(text.as_bytes())));
                    let mut writer = MgfWriter::new(Vec::with_capacity(text.len()));
                    let stats = format_spectra(reader, &mut writer).unwrap();
                    black_box(writer.finish().unwrap());
                    stats
                })
            },
        );
    }

    group.finish();
}

fn bench_extract(c: &mut Criterion) {
    let mut group = c.benchmark_group("extract_features");

    for num_spectra in [500, 2000] {
        let text = synthetic_mgf(num_spectra, 100);
        group.throughput(Throughput::Elements(num_spectra as u64));

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}spectra", num_spectra)),
            &text,
            |b, text| {
                b.iter(|| {
                    let reader = MgfReader::new(BufReader::new(Cursor::new(text.as_bytes())));
                    black_box(extract_from_reader(reader, None).unwrap())
                })
            },
        );
    }

    group.finish();
}

fn bench_partition(c: &mut Criterion) {
    let table: FeatureTable = (0..10_000)
        .map(|i| FeatureRow::new(&format!("F0:{}", i), 500.0, 2, i as f64, "PEPTIDEK"))
        .collect();

    c.bench_function("partition_10k_rows", |b| {
        let partitioner = Partitioner::default().with_seed(Some(42));
        b.iter(|| black_box(partitioner.partition(table.clone())))
    });
}

criterion_group!(benches, bench_format, bench_extract, bench_partition);
criterion_main!(benches);
