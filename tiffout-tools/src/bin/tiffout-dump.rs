use tiffout::TiffReader;
use tracing_subscriber::prelude::*;

fn main() {
    let path = std::env::args().nth(1).expect("Usage: tiffout-dump <file>");

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::builder().from_env_lossy())
        .with(tracing_subscriber::fmt::Layer::default().compact())
        .init();

    let data = std::fs::read(path).unwrap();
    let contents = TiffReader::new(&data).read().unwrap();

    println!("{}", contents.debug_dump());
}
