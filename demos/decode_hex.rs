//! Reads a hex dump of a LapRF byte stream from stdin and prints the decoded records.
//!
//! ```text
//! echo "5a 0e 00 ..." | cargo run --example decode_hex
//! ```

use std::io::Read;

use laprf::{frame::FrameBuffer, record::RecordDecoder};
use log::{error, info};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    simplelog::TermLogger::init(
        log::LevelFilter::Debug,
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )
    .unwrap();

    let mut input = String::new();
    std::io::stdin().read_to_string(&mut input)?;

    let digits: String = input.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = hex::decode(digits)?;

    let decoder = RecordDecoder::default();
    let mut buffer = FrameBuffer::new();

    for payload in buffer.push(&bytes) {
        match payload.and_then(|payload| decoder.decode(&payload)) {
            Ok(Some(record)) => info!("{:?}", record),
            Ok(None) => info!("Empty record"),
            Err(err) => error!("{}", err),
        }
    }

    if !buffer.is_empty() {
        info!("{} bytes of an unterminated record left over", buffer.len());
    }

    Ok(())
}
