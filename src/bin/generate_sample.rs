use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Builder, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use arrow::util::pretty::print_batches;
use parquet::arrow::ArrowWriter;

/// SplitMix64. A fixed seed writes the same file on every run.
struct SampleRng(u64);

impl SampleRng {
    /// Uniform in `[0, 1)`.
    fn next_f64(&mut self) -> f64 {
        self.0 = self.0.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^= z >> 31;
        (z >> 11) as f64 / (1u64 << 53) as f64
    }
}

// Area name, first ZIP, ZIP count, 2BR base rent.
const AREAS: [(&str, u32, u32, f64); 5] = [
    ("Los Angeles-Long Beach-Glendale, CA HUD Metro FMR Area", 90001, 12, 2400.0),
    ("San Diego-Carlsbad, CA MSA", 91901, 8, 2600.0),
    ("Austin-Round Rock, TX MSA", 73301, 10, 1700.0),
    ("Nassau-Suffolk, NY HUD Metro FMR Area", 501, 4, 2900.0),
    ("Abilene, TX MSA", 79601, 6, 1100.0),
];

// Unit-size multipliers relative to the 2BR figure.
const BEDROOM_FACTORS: [f64; 5] = [0.72, 0.82, 1.0, 1.32, 1.55];

fn main() -> Result<()> {
    let mut rng = SampleRng(42);

    let mut zips: Vec<String> = Vec::new();
    let mut areas: Vec<&str> = Vec::new();
    // rents[bedroom] = 2BR-relative standard figure per row, None when unpublished
    let mut rents: Vec<Vec<Option<f64>>> = vec![Vec::new(); BEDROOM_FACTORS.len()];

    for &(area, first_zip, count, base) in &AREAS {
        for i in 0..count {
            zips.push(format!("{:05}", first_zip + i));
            areas.push(area);
            let local = base * (0.8 + 0.4 * rng.next_f64());
            for (bedroom, factor) in BEDROOM_FACTORS.iter().enumerate() {
                // Roughly one in twenty figures is left blank, as in the real release.
                let published = rng.next_f64() > 0.05;
                let value = (local * factor / 10.0).round() * 10.0;
                rents[bedroom].push(published.then_some(value));
            }
        }
    }

    // The published sheet wraps its headers; keep the line breaks so the
    // loader's header cleanup gets exercised.
    let mut fields = vec![
        Field::new("ZIP\nCode", DataType::Utf8, false),
        Field::new("HUD Fair Market Rent Area Name", DataType::Utf8, false),
    ];
    let mut columns: Vec<ArrayRef> = vec![
        Arc::new(StringArray::from(zips.clone())),
        Arc::new(StringArray::from(areas)),
    ];

    for (bedroom, figures) in rents.iter().enumerate() {
        let tiers = [
            ("", 1.0),
            (" -\n90%\nPayment\nStandard", 0.9),
            (" -\n110%\nPayment\nStandard", 1.1),
        ];
        for (label, scale) in tiers {
            fields.push(Field::new(
                format!("SAFMR\n{bedroom}BR{label}"),
                DataType::Float64,
                true,
            ));
            let mut builder = Float64Builder::with_capacity(figures.len());
            for figure in figures {
                builder.append_option(figure.map(|v| v * scale));
            }
            columns.push(Arc::new(builder.finish()));
        }
    }

    let schema = Arc::new(Schema::new(fields));
    let batch = RecordBatch::try_new(schema.clone(), columns).context("building record batch")?;

    let output_path = "sample_safmr.parquet";
    let file = std::fs::File::create(output_path)
        .with_context(|| format!("creating {output_path}"))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing record batch")?;
    writer.close().context("closing parquet writer")?;

    print_batches(&[batch.slice(0, 3)]).context("printing preview")?;
    println!(
        "Wrote {} ZIP codes across {} areas to {output_path}",
        zips.len(),
        AREAS.len()
    );
    Ok(())
}
