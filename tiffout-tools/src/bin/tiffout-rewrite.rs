use tiffout::{GapReusingWriter, OutputSet, SequentialWriter, TiffReader};
use tracing_subscriber::prelude::*;

fn main() {
    let mut args = std::env::args().skip(1);
    let usage = "Usage: tiffout-rewrite <input> <output> [--sequential]";
    let input = args.next().expect(usage);
    let output = args.next().expect(usage);
    let sequential = args.next().as_deref() == Some("--sequential");

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::builder().from_env_lossy())
        .with(tracing_subscriber::fmt::Layer::default().compact())
        .init();

    let data = std::fs::read(input).unwrap();
    let contents = TiffReader::new(&data).read().unwrap();
    let byte_order = contents.byte_order;
    let output_set = OutputSet::from_contents(&contents).unwrap();

    let segment = if sequential {
        SequentialWriter::new(byte_order).write(output_set)
    } else {
        GapReusingWriter::new(byte_order, &data).write(output_set)
    }
    .unwrap();

    tracing::info!("Rewrote {} bytes into {} bytes", data.len(), segment.len());

    std::fs::write(output, segment).unwrap();
}
