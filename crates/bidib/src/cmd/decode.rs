use std::io::Read;

use serde::Serialize;

use bidib_frame::FrameSplitter;
use bidib_wire::{message_name, split_packet, MessageRecord};

use crate::cmd::DecodeArgs;
use crate::exit::{frame_error, io_error, wire_error, CliError, CliResult, SUCCESS, USAGE};
use crate::hex::{format_hex, parse_hex};

#[derive(Serialize)]
struct RecordOutput {
    address: String,
    number: u8,
    #[serde(rename = "type")]
    ty: u8,
    type_name: String,
    payload: String,
}

pub fn run(args: DecodeArgs) -> CliResult<i32> {
    let input = match args.hex {
        Some(hex) => hex,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .map_err(|err| io_error("reading stdin", err))?;
            buf
        }
    };

    let bytes = parse_hex(&input).map_err(|err| CliError::new(USAGE, err))?;

    let mut splitter = FrameSplitter::new();
    let frames = splitter.feed(&bytes);
    if frames.is_empty() && splitter.pending() == 0 {
        return Err(CliError::new(USAGE, "no complete frame in input"));
    }

    for frame in frames {
        let packet =
            bidib_frame::open(&frame).map_err(|err| frame_error("invalid frame", err))?;

        for record in split_packet(&packet) {
            let record = record.map_err(|err| wire_error("invalid record", err))?;
            print_record(&record, args.json);
        }
    }

    if splitter.pending() > 0 {
        eprintln!("warning: {} trailing bytes before a closing 0xFE", splitter.pending());
    }

    Ok(SUCCESS)
}

fn print_record(record: &MessageRecord, json: bool) {
    if json {
        let out = RecordOutput {
            address: format!("{:?}", record.address),
            number: record.number,
            ty: record.message.ty(),
            type_name: message_name(record.message.ty()),
            payload: format_hex(record.message.payload()),
        };
        println!(
            "{}",
            serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
        );
    } else {
        println!("{record}");
    }
}
